//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::{Config, LogFileConfig};

impl Config {
    /// Render the config as a commented TOML document
    pub fn to_toml(&self) -> String {
        let mut output = String::new();
        output.push_str("# vitrine configuration\n");
        output.push_str("# Environment variables override these values:\n");
        output.push_str("#   VITRINE_LANG, VITRINE_STORAGE, VITRINE_NO_TUI, RUST_LOG\n\n");

        match &self.lang {
            Some(lang) => output.push_str(&format!("lang = \"{}\"\n", lang.code())),
            None => output.push_str("# lang = \"en\"            # force a language at startup\n"),
        }

        match &self.storage_path {
            Some(path) => output.push_str(&format!(
                "storage_path = {:?}\n",
                path.display().to_string()
            )),
            None => output.push_str("storage_path = \"memory\"\n"),
        }

        match &self.dictionaries {
            Some(path) => output.push_str(&format!(
                "dictionaries = {:?}\n",
                path.display().to_string()
            )),
            None => output.push_str("# dictionaries = \"/path/to/dictionaries.toml\"\n"),
        }

        output.push_str(&self.carousel_to_toml());
        output.push_str(&self.observers_to_toml());
        output.push_str(&self.logging_to_toml());
        output
    }

    fn carousel_to_toml(&self) -> String {
        let c = &self.carousel;
        format!(
            "\n[carousel]\n\
             swipe_threshold = {:?}      # px of horizontal travel before a swipe counts\n\
             transition_ms = {}\n\
             easing = {:?}\n",
            c.swipe_threshold, c.transition_ms, c.easing
        )
    }

    fn observers_to_toml(&self) -> String {
        let o = &self.observers;
        format!(
            "\n[observers]\n\
             reveal_threshold = {:?}\n\
             spy_bottom_margin_percent = {:?}\n",
            o.reveal_threshold, o.spy_bottom_margin_percent
        )
    }

    fn logging_to_toml(&self) -> String {
        let l = &self.logging;
        let mut out = format!("\n[logging]\nlevel = {:?}\n", l.level_name());
        match &l.file {
            Some(file) => out.push_str(&format!(
                "\n[logging.file]\n\
                 dir = {:?}\n\
                 rotation = {:?}\n\
                 prefix = {:?}\n",
                file.dir.display().to_string(),
                file.rotation.as_str(),
                file.prefix
            )),
            None => {
                let file = LogFileConfig::default();
                out.push_str(&format!(
                    "\n# Uncomment to also write JSON logs to a rolling file\n\
                     # [logging.file]\n\
                     # dir = {:?}\n\
                     # rotation = {:?}      # hourly | daily | never\n\
                     # prefix = {:?}\n",
                    file.dir.display().to_string(),
                    file.rotation.as_str(),
                    file.prefix
                ));
            }
        }
        out
    }
}
