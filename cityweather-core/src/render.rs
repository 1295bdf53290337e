//! Output surface: named containers that are replaced wholesale, plus alerts.

use std::{
    collections::BTreeMap,
    fmt,
    io::{self, Write},
};

use tracing::warn;

/// The page regions a flow can write into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Container {
    /// Static reading output.
    Results,
    WeatherData,
    AirQualityData,
}

impl Container {
    pub fn id(&self) -> &'static str {
        match self {
            Container::Results => "divResult",
            Container::WeatherData => "weatherData",
            Container::AirQualityData => "airQualityData",
        }
    }

    fn heading_tag(&self) -> &'static str {
        match self {
            Container::Results => "h1",
            Container::WeatherData | Container::AirQualityData => "h2",
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A heading followed by paragraphs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    pub heading: String,
    pub paragraphs: Vec<String>,
}

impl Block {
    pub fn new(heading: impl Into<String>) -> Self {
        Self { heading: heading.into(), paragraphs: Vec::new() }
    }

    pub fn paragraph(mut self, text: impl Into<String>) -> Self {
        self.paragraphs.push(text.into());
        self
    }

    /// HTML fragment with every text node escaped.
    pub fn to_html(&self, heading_tag: &str) -> String {
        let mut html = format!("<{heading_tag}>{}</{heading_tag}>", escape_html(&self.heading));
        for p in &self.paragraphs {
            html.push_str(&format!("\n<p>{}</p>", escape_html(p)));
        }
        html
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.heading)?;
        writeln!(f, "{}", "-".repeat(self.heading.chars().count()))?;
        for p in &self.paragraphs {
            writeln!(f, "{p}")?;
        }
        Ok(())
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// The rendering capability of both flows.
pub trait Renderer {
    /// Clear `container` and fill it with `block`.
    fn replace(&mut self, container: Container, block: Block);

    /// Surface a failure to the user.
    fn alert(&mut self, message: &str);
}

/// In-memory model of the page; keeps the current content of each container.
#[derive(Debug, Clone, Default)]
pub struct Page {
    blocks: BTreeMap<Container, Block>,
    alerts: Vec<String>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block(&self, container: Container) -> Option<&Block> {
        self.blocks.get(&container)
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }
}

impl Renderer for Page {
    fn replace(&mut self, container: Container, block: Block) {
        self.blocks.insert(container, block);
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Html,
}

/// Writes blocks to `out` and alerts to `err`.
#[derive(Debug)]
pub struct TerminalRenderer<O: Write, E: Write> {
    out: O,
    err: E,
    format: OutputFormat,
}

impl TerminalRenderer<io::Stdout, io::Stderr> {
    pub fn stdio(format: OutputFormat) -> Self {
        Self::new(io::stdout(), io::stderr(), format)
    }
}

impl<O: Write, E: Write> TerminalRenderer<O, E> {
    pub fn new(out: O, err: E, format: OutputFormat) -> Self {
        Self { out, err, format }
    }

    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> Renderer for TerminalRenderer<O, E> {
    fn replace(&mut self, container: Container, block: Block) {
        let res = match self.format {
            OutputFormat::Text => writeln!(self.out, "{block}"),
            OutputFormat::Html => writeln!(
                self.out,
                "<div id=\"{}\">\n{}\n</div>",
                container.id(),
                block.to_html(container.heading_tag())
            ),
        };

        if let Err(e) = res.and_then(|()| self.out.flush()) {
            warn!(error = %e, %container, "Failed to write block");
        }
    }

    fn alert(&mut self, message: &str) {
        if let Err(e) = writeln!(self.err, "Ошибка: {message}") {
            warn!(error = %e, "Failed to write alert");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather_block() -> Block {
        Block::new("Погода в городе Paris")
            .paragraph("Температура: 8.0°C")
            .paragraph("Описание: clear sky")
    }

    #[test]
    fn html_fragment_escapes_text() {
        let block = Block::new("<script>").paragraph("a & b");
        assert_eq!(block.to_html("h2"), "<h2>&lt;script&gt;</h2>\n<p>a &amp; b</p>");
    }

    #[test]
    fn page_replaces_previous_content() {
        let mut page = Page::new();
        page.replace(Container::WeatherData, Block::new("old").paragraph("x"));
        page.replace(Container::WeatherData, weather_block());

        let block = page.block(Container::WeatherData).unwrap();
        assert_eq!(block, &weather_block());
        assert!(page.block(Container::AirQualityData).is_none());
    }

    #[test]
    fn terminal_text_output() {
        let mut r = TerminalRenderer::new(Vec::new(), Vec::new(), OutputFormat::Text);
        r.replace(Container::WeatherData, weather_block());
        r.alert("boom");

        let (out, err) = r.into_parts();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("Погода в городе Paris\n"));
        assert!(out.contains("Температура: 8.0°C\n"));
        assert_eq!(String::from_utf8(err).unwrap(), "Ошибка: boom\n");
    }

    #[test]
    fn terminal_html_output_wraps_container() {
        let mut r = TerminalRenderer::new(Vec::new(), Vec::new(), OutputFormat::Html);
        r.replace(Container::AirQualityData, Block::new("AQ").paragraph("AQI: 2"));

        let (out, _) = r.into_parts();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out, "<div id=\"airQualityData\">\n<h2>AQ</h2>\n<p>AQI: 2</p>\n</div>\n");
    }

    #[test]
    fn results_container_uses_top_level_heading() {
        let mut r = TerminalRenderer::new(Vec::new(), Vec::new(), OutputFormat::Html);
        r.replace(Container::Results, Block::new("Москва"));

        let (out, _) = r.into_parts();
        assert!(String::from_utf8(out).unwrap().contains("<h1>Москва</h1>"));
    }
}
