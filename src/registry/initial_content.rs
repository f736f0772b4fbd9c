#[cfg(test)]
use mockall::automock;

/// Supplies the text shown for a buffer that has never been saved.
#[cfg_attr(test, automock)]
pub trait InitialContentSource: Send + Sync {
    fn initial_content(
        &self,
        is_dev: bool,
    ) -> String;
}

const DEFAULT_CONTENT: &str = "\
Welcome to your notes.

Everything typed here is saved to a plain text file and kept in sync
with edits made by other programs.
";

const DEFAULT_DEV_CONTENT: &str = "\
Development buffer.

This file uses the buffer-dev-<name>.txt naming scheme.
";

/// Fixed production/development placeholder texts
#[derive(Debug, Clone)]
pub struct StaticInitialContent {
    content: String,
    dev_content: String,
}

impl StaticInitialContent {
    pub fn new(
        content: impl Into<String>,
        dev_content: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            dev_content: dev_content.into(),
        }
    }
}

impl Default for StaticInitialContent {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT, DEFAULT_DEV_CONTENT)
    }
}

impl InitialContentSource for StaticInitialContent {
    fn initial_content(
        &self,
        is_dev: bool,
    ) -> String {
        if is_dev {
            self.dev_content.clone()
        } else {
            self.content.clone()
        }
    }
}
