//! `procdl types`: list selectable process types.

use procdl_core::config::ProcdlConfig;

pub fn run_types(cfg: &ProcdlConfig) {
    for option in &cfg.process_types {
        let marker = if cfg.default_process_type.as_deref() == Some(option.as_str()) {
            "*"
        } else {
            " "
        };
        println!("{} {}", marker, option);
    }
}
