//! Per-session cleaner state

use dashkit_common::Flash;
use tracing::info;

use crate::impute::{impute, FillMethod, ImputationReport, ImputeOptions, Scope};
use crate::table::Table;

/// File name offered for the cleaned download
pub const CLEANED_FILE_NAME: &str = "cleaned_dataset.csv";

/// An uploaded, successfully parsed dataset
#[derive(Debug, Clone)]
pub struct Dataset {
    pub file_name: String,
    pub table: Table,
}

/// Options chosen in the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanOptions {
    pub method: FillMethod,
    pub exclude_non_numeric: bool,
    pub show_download: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            method: FillMethod::Mean,
            exclude_non_numeric: false,
            show_download: true,
        }
    }
}

impl CleanOptions {
    pub fn impute_options(&self) -> ImputeOptions {
        ImputeOptions::new(self.method, Scope::from_exclude_non_numeric(self.exclude_non_numeric))
    }
}

/// Everything one browser session holds
#[derive(Debug, Clone, Default)]
pub struct CleanerSession {
    pub dataset: Option<Dataset>,
    pub options: CleanOptions,
    pub result: Option<ImputationReport>,
    pub flash: Option<Flash>,
}

impl CleanerSession {
    /// Replace the dataset; any previous cleaning result no longer applies
    pub fn set_dataset(&mut self, file_name: String, table: Table) {
        self.dataset = Some(Dataset { file_name, table });
        self.result = None;
    }

    /// Forget the dataset after a failed upload
    pub fn clear_dataset(&mut self) {
        self.dataset = None;
        self.result = None;
    }

    /// Run imputation on the uploaded dataset with `options`
    ///
    /// Returns `None` when nothing has been uploaded.
    pub fn clean(&mut self, options: CleanOptions) -> Option<&ImputationReport> {
        self.options = options;
        let dataset = self.dataset.as_ref()?;

        let report = impute(&dataset.table, options.impute_options());
        info!(
            "Cleaned {} with {}: {} cells filled, {} missing remain",
            dataset.file_name,
            options.method,
            report.cells_filled(),
            report.remaining_missing
        );
        self.result = Some(report);
        self.result.as_ref()
    }

    pub fn take_flash(&mut self) -> Option<Flash> {
        self.flash.take()
    }
}
