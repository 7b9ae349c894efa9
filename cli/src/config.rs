use crate::loader::LoaderOptions;
use std::path::PathBuf;

/// Resolved runtime settings shared by the one-shot commands and the menu.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Bid export to load
    pub file: PathBuf,
    pub loader: LoaderOptions,
    /// Render records as JSON instead of text lines
    pub json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            file: PathBuf::from("eBid_Monthly_Sales_Dec_2016.csv"),
            loader: LoaderOptions::default(),
            json: false,
        }
    }
}
