use clap::Parser;

use crate::config::Settings;

#[derive(Debug, Default, Parser, Clone, Copy)]
pub struct Show;

impl Show {
    pub fn run(self, settings: &Settings) {
        println!("{:#?}", settings);
    }
}
