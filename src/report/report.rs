use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use plotly::Plot;

/// A titled block of an HTML report holding content and plots in insertion
/// order.
pub struct ReportSection {
    title: String,
    blocks: Vec<Markup>,
}

impl ReportSection {
    pub fn new(title: &str) -> Self {
        ReportSection {
            title: title.to_string(),
            blocks: Vec::new(),
        }
    }

    pub fn add_content(&mut self, content: Markup) {
        self.blocks.push(content);
    }

    pub fn add_plot(&mut self, plot: Plot) {
        // Inline plot markup; the report head loads plotly.js once.
        self.blocks.push(PreEscaped(plot.to_inline_html(None)));
    }

    fn render(&self) -> Markup {
        html! {
            section {
                h2 { (self.title) }
                @for block in &self.blocks {
                    div { (block) }
                }
            }
        }
    }
}

/// A minimal HTML report: a title page plus sections, written as one
/// self-contained file (plots fetch plotly.js from the CDN).
pub struct Report {
    title: String,
    subtitle: String,
    sections: Vec<ReportSection>,
}

impl Report {
    pub fn new(title: &str, subtitle: &str) -> Self {
        Report {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            sections: Vec::new(),
        }
    }

    pub fn add_section(&mut self, section: ReportSection) {
        self.sections.push(section);
    }

    fn render(&self) -> Markup {
        let generated = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="utf-8";
                    title { (self.title) }
                    script src="https://cdn.plot.ly/plotly-2.27.0.min.js" {}
                    style {
                        "body { font-family: sans-serif; margin: 2em auto; max-width: 960px; }"
                        "section { margin-bottom: 2em; }"
                        "table { border-collapse: collapse; }"
                        "td, th { border: 1px solid #999; padding: 0.3em 0.8em; }"
                        "pre { background: #f4f4f4; padding: 1em; }"
                    }
                }
                body {
                    h1 { (self.title) }
                    p { (self.subtitle) }
                    p { "Generated " (generated) }
                    @for section in &self.sections {
                        (section.render())
                    }
                }
            }
        }
    }

    /// Render and write the report to an HTML file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let markup = self.render();
        let mut file = File::create(&path).with_context(|| {
            format!("Failed to create report file: {}", path.as_ref().display())
        })?;
        file.write_all(markup.into_string().as_bytes())
            .context("Failed to write report")?;
        Ok(())
    }
}
