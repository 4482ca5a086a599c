use crate::core::config::data::Config;
use crate::core::config::defaults::DEFAULT_TEMPERATURE;

fn print_text(key: &str, value: &Option<String>, fallback: &str) {
    match value {
        Some(value) => println!("  {key}: {value}"),
        None => println!("  {key}: (unset, default {fallback})"),
    }
}

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        print_text("model", &self.model, self.model_or_default());
        print_text("base-url", &self.base_url, self.base_url_or_default());
        match self.temperature {
            Some(temperature) => println!("  temperature: {temperature}"),
            None => println!("  temperature: (unset, default {DEFAULT_TEMPERATURE})"),
        }
        match self.stream {
            Some(true) => println!("  stream: on"),
            Some(false) => println!("  stream: off"),
            None => println!("  stream: (unset, default on)"),
        }
        print_text(
            "assistant-name",
            &self.assistant_name,
            self.assistant_name_or_default(),
        );
        print_text(
            "knowledge-file",
            &self.knowledge_file,
            self.knowledge_file_or_default(),
        );
        print_text(
            "history-file",
            &self.history_file,
            self.history_file_or_default(),
        );
        match &self.referer {
            Some(referer) => println!("  referer: {referer}"),
            None => println!("  referer: (unset)"),
        }
        match &self.app_title {
            Some(title) => println!("  app-title: {title}"),
            None => println!("  app-title: (unset)"),
        }
    }
}
