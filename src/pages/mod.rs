//! The application's page routes and the feature view each one mounts.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Home,
    Chatbot,
    Consultations,
    Forums,
    Parents,
    Partner,
    SymptomsAnalyzer,
    Tracker,
}

impl Page {
    pub const ALL: [Page; 8] = [
        Page::Home,
        Page::Chatbot,
        Page::Consultations,
        Page::Forums,
        Page::Parents,
        Page::Partner,
        Page::SymptomsAnalyzer,
        Page::Tracker,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Chatbot => "/chatbot",
            Page::Consultations => "/consultations",
            Page::Forums => "/forums",
            Page::Parents => "/parents",
            Page::Partner => "/partner",
            Page::SymptomsAnalyzer => "/symptomsanalyzer",
            Page::Tracker => "/tracker",
        }
    }

    /// Name of the feature view mounted on this page.
    pub fn component(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Chatbot => "Chatbot",
            Page::Consultations => "Consultations",
            Page::Forums => "Forums",
            Page::Parents => "ParentsDashboard",
            Page::Partner => "PartnerDashboard",
            Page::SymptomsAnalyzer => "SymptomsAnalyzer",
            Page::Tracker => "PeriodTracker",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Chatbot => "Chatbot",
            Page::Consultations => "Consultations",
            Page::Forums => "Forums",
            Page::Parents => "Parents",
            Page::Partner => "Partner",
            Page::SymptomsAnalyzer => "Symptoms Analyzer",
            Page::Tracker => "Period Tracker",
        }
    }

    /// Every page except the landing page sits behind the guard.
    pub fn is_guarded(&self) -> bool {
        !matches!(self, Page::Home)
    }

    pub fn from_path(path: &str) -> Option<Page> {
        Page::ALL.into_iter().find(|p| p.path() == path)
    }
}
