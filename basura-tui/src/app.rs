use std::sync::Arc;

use basura_core::{
    model::Period,
    plugin::SourceId,
    service::{BasuraService, DashboardSnapshot, PredictionReport},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    SourceSelect,
    Dashboard,
    Predict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormField {
    District,
    Volume,
    Period,
}

impl FormField {
    pub(crate) fn next(self) -> Self {
        match self {
            FormField::District => FormField::Volume,
            FormField::Volume => FormField::Period,
            FormField::Period => FormField::District,
        }
    }
}

pub(crate) struct App {
    pub service: Arc<BasuraService>,
    pub top: usize,

    pub screen: Screen,
    pub sources: Vec<(SourceId, String)>,
    pub source_list_index: usize,
    pub selected_source: Option<SourceId>,

    pub snapshot: Option<DashboardSnapshot>,
    pub district_list_index: usize,

    pub district_input: String,
    pub volume_input: String,
    pub period: Period,
    pub focus: FormField,
    pub report: Option<PredictionReport>,

    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(service: Arc<BasuraService>, top: usize) -> Self {
        let sources = service.sources();
        Self {
            service,
            top,
            screen: Screen::SourceSelect,
            sources,
            source_list_index: 0,
            selected_source: None,
            snapshot: None,
            district_list_index: 0,
            district_input: String::new(),
            volume_input: String::new(),
            period: Period::Daily,
            focus: FormField::District,
            report: None,
            is_loading: false,
            error_message: None,
        }
    }

    pub(crate) fn select_current_source(&mut self) -> Option<SourceId> {
        let (id, _name) = self.sources.get(self.source_list_index)?;
        let id = id.clone();
        if self.selected_source.as_ref() != Some(&id) {
            self.snapshot = None;
            self.report = None;
            self.district_list_index = 0;
        }
        self.selected_source = Some(id.clone());
        self.screen = Screen::Dashboard;
        Some(id)
    }

    pub(crate) fn selected_source_name(&self) -> &str {
        self.selected_source
            .as_ref()
            .and_then(|selected| self.sources.iter().find(|(id, _)| id == selected))
            .map_or("<no source>", |(_, name)| name.as_str())
    }

    pub(crate) fn toggle_period(&mut self) {
        self.period = match self.period {
            Period::Daily => Period::Weekly,
            Period::Weekly => Period::Daily,
        };
    }

    pub(crate) fn district_count(&self) -> usize {
        self.snapshot
            .as_ref()
            .map_or(0, |snapshot| snapshot.results.len())
    }
}

/// Parse the volume field; accepts a decimal comma.
pub(crate) fn parse_volume(input: &str) -> Option<f64> {
    input.trim().replace(',', ".").parse::<f64>().ok()
}
