//! Shot charts rendered as SVG over the court geometry.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use resvg::{tiny_skia, usvg};
use tracing::{debug, info};

use crate::config::{
    COURT_BG_COLOR, COURT_LINE_COLOR, COURT_LINE_WIDTH, CourtSpec, DEFAULT_DPI,
    DEFAULT_FIGURE_SIZE, MADE_SHOT_COLOR, MISSED_SHOT_COLOR, SHOT_MARKER_ALPHA, SHOT_MARKER_SIZE,
    TEAM_MADE_SHOT_COLOR, TEAM_MISSED_SHOT_COLOR,
};
use crate::court::{CourtGeometry, LineStyle, Point, Shape, ViewBounds, court_geometry};
use crate::error::ChartError;
use crate::filter::{ShotFilter, filter_shots};
use crate::shots::{ShotMade, ShotTable};
use crate::summary::{ShotSummary, summarize};

/// Margin kept around shots that fall outside the default view.
pub const SHOT_VIEW_MARGIN: f64 = 30.0;

// Figure units per inch; `SaveOptions::dpi` rescales on output.
const UNITS_PER_INCH: f64 = 100.0;
const PT: f64 = UNITS_PER_INCH / 72.0;
const FIGURE_PAD: f64 = 20.0;
const TITLE_BAND: f64 = 70.0;
const FOOTER_BAND: f64 = 36.0;
const ARC_STEP_DEG: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub title: Option<String>,
    pub made_color: String,
    pub missed_color: String,
    /// Marker area in points squared.
    pub marker_size: f64,
    pub fig_size: (f64, f64),
    pub line_color: String,
    pub line_width: f64,
    pub court_color: String,
    pub outer_lines: bool,
    pub show_title: bool,
    pub show_legend: bool,
    pub show_breakdown: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: None,
            made_color: MADE_SHOT_COLOR.to_string(),
            missed_color: MISSED_SHOT_COLOR.to_string(),
            marker_size: SHOT_MARKER_SIZE,
            fig_size: DEFAULT_FIGURE_SIZE,
            line_color: COURT_LINE_COLOR.to_string(),
            line_width: COURT_LINE_WIDTH,
            court_color: COURT_BG_COLOR.to_string(),
            outer_lines: false,
            show_title: true,
            show_legend: true,
            show_breakdown: true,
        }
    }
}

impl ChartOptions {
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Purple/grey team scheme instead of green/red.
    pub fn team_colors(mut self) -> Self {
        self.made_color = TEAM_MADE_SHOT_COLOR.to_string();
        self.missed_color = TEAM_MISSED_SHOT_COLOR.to_string();
        self
    }
}

#[derive(Debug, Clone)]
pub struct SaveOptions {
    pub dpi: u32,
    /// Crop the output to the drawn content.
    pub tight: bool,
    pub background: String,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            tight: true,
            background: "white".to_string(),
        }
    }
}

/// The open rendering surface of a chart.
#[derive(Debug, Clone)]
struct Figure {
    body: String,
    width: f64,
    height: f64,
    content: (f64, f64, f64, f64),
    view: ViewBounds,
}

#[derive(Debug)]
pub struct ShotChart {
    shots: ShotTable,
    options: ChartOptions,
    court: CourtSpec,
    figure: Option<Figure>,
}

impl ShotChart {
    pub fn new(shots: &ShotTable, options: ChartOptions) -> Self {
        Self::with_court(shots, options, CourtSpec::NBA)
    }

    pub fn with_court(shots: &ShotTable, options: ChartOptions, court: CourtSpec) -> Self {
        Self {
            shots: shots.clone(),
            options,
            court,
            figure: None,
        }
    }

    pub fn shots(&self) -> &ShotTable {
        &self.shots
    }

    pub fn summary(&self) -> ShotSummary {
        summarize(&self.shots)
    }

    pub fn is_open(&self) -> bool {
        self.figure.is_some()
    }

    /// View bounds of the plotted figure, if any.
    pub fn view(&self) -> Option<ViewBounds> {
        self.figure.as_ref().map(|f| f.view)
    }

    /// Draws the court and shots onto a fresh figure, replacing any open one.
    pub fn plot(&mut self) {
        let geometry = court_geometry(&self.court, self.options.outer_lines);
        let view = chart_view(&geometry, &self.shots);
        let summary = summarize(&self.shots);
        let opts = &self.options;

        let width = opts.fig_size.0 * UNITS_PER_INCH;
        let height = opts.fig_size.1 * UNITS_PER_INCH;
        let plot_w = width - 2.0 * FIGURE_PAD;
        let plot_h = height - 2.0 * FIGURE_PAD - TITLE_BAND - FOOTER_BAND;
        let scale = (plot_w / view.width()).min(plot_h / view.height());
        let left = (width - view.width() * scale) / 2.0;
        let top = FIGURE_PAD + TITLE_BAND;
        let map = Mapper {
            view,
            scale,
            left,
            top,
        };

        let mut body = String::new();
        let (x0, y0) = map.px(Point::new(view.x_min, view.y_max));
        let _ = writeln!(
            body,
            r#"<rect x="{x0:.2}" y="{y0:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
            view.width() * scale,
            view.height() * scale,
            opts.court_color
        );
        draw_court(&mut body, &geometry, &map, opts);
        let radius = opts.marker_size.sqrt() / 2.0 * PT;
        draw_shots(&mut body, &self.shots, &map, opts, radius);

        if opts.show_title {
            let title = opts.title.as_deref().unwrap_or("Shot Chart");
            let _ = writeln!(
                body,
                r##"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-family="sans-serif" font-size="{:.1}" font-weight="bold" fill="#333333">{}</text>"##,
                width / 2.0,
                FIGURE_PAD + 14.0 * PT,
                14.0 * PT,
                escape_xml(title)
            );
            let _ = writeln!(
                body,
                r##"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-family="sans-serif" font-size="{:.1}" font-weight="bold" fill="#333333">FG: {}</text>"##,
                width / 2.0,
                FIGURE_PAD + 32.0 * PT,
                14.0 * PT,
                escape_xml(&summary.fg_line())
            );
        }
        if opts.show_legend {
            draw_legend(&mut body, &summary, &map, opts, radius);
        }
        if opts.show_breakdown {
            if let Some(line) = summary.breakdown_line() {
                let (_, bottom) = map.px(Point::new(view.x_min, view.y_min));
                let _ = writeln!(
                    body,
                    r##"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-family="sans-serif" font-size="{:.1}" font-style="italic" fill="#444444">{}</text>"##,
                    width / 2.0,
                    bottom + 10.0 * PT + 8.0,
                    10.0 * PT,
                    escape_xml(&line)
                );
            }
        }

        let (cx0, cy0) = map.px(Point::new(view.x_min, view.y_max));
        let (cx1, cy1) = map.px(Point::new(view.x_max, view.y_min));
        let content_top = if opts.show_title { FIGURE_PAD } else { cy0 };
        let content_bottom = if opts.show_breakdown {
            cy1 + FOOTER_BAND
        } else {
            cy1
        };
        let figure = Figure {
            body,
            width,
            height,
            content: (
                (cx0 - FIGURE_PAD / 2.0).max(0.0),
                (content_top - FIGURE_PAD / 2.0).max(0.0),
                (cx1 + FIGURE_PAD / 2.0).min(width),
                (content_bottom + FIGURE_PAD / 2.0).min(height),
            ),
            view,
        };
        debug!(shots = self.shots.len(), "plotted shot chart");
        self.figure = Some(figure);
    }

    /// Full SVG document for the current figure, plotting first if needed.
    pub fn render_svg(&mut self, save: &SaveOptions) -> String {
        if self.figure.is_none() {
            self.plot();
        }
        match self.figure.as_ref() {
            Some(figure) => compose_document(figure, save),
            None => String::new(),
        }
    }

    /// Writes the chart to `path`, creating parent directories. The format
    /// follows the extension: `.svg` as markup, `.png` rasterized.
    pub fn save(&mut self, path: &Path, save: &SaveOptions) -> Result<PathBuf, ChartError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if ext != "svg" && ext != "png" {
            return Err(ChartError::UnsupportedFormat(format!(".{ext}")));
        }
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let svg = self.render_svg(save);
        if ext == "png" {
            fs::write(path, rasterize(&svg)?)?;
        } else {
            fs::write(path, svg)?;
        }
        info!(path = %path.display(), shots = self.shots.len(), "saved shot chart");
        Ok(path.to_path_buf())
    }

    /// Releases the figure. Returns false when nothing was open.
    pub fn close(&mut self) -> bool {
        let released = self.figure.take().is_some();
        if released {
            debug!("closed shot chart figure");
        }
        released
    }
}

/// PNG bytes for an SVG document, sized by its width and height attributes.
fn rasterize(svg: &str) -> Result<Vec<u8>, ChartError> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    let tree =
        usvg::Tree::from_str(svg, &opt).map_err(|e| ChartError::Render(e.to_string()))?;
    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height()).ok_or_else(|| {
        ChartError::Render(format!("empty canvas {}x{}", size.width(), size.height()))
    })?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    pixmap
        .encode_png()
        .map_err(|e| ChartError::Render(e.to_string()))
}

/// Default court view grown to keep every located shot visible.
pub fn chart_view(geometry: &CourtGeometry, shots: &ShotTable) -> ViewBounds {
    let located = shots
        .iter()
        .filter_map(|s| s.location())
        .map(|(x, y)| Point::new(x, y));
    geometry.view.expanded_to_fit(located, SHOT_VIEW_MARGIN)
}

/// Chart of one player's shots (name substring, case-insensitive).
pub fn player_shot_chart(
    shots: &ShotTable,
    player_name: &str,
    options: ChartOptions,
    output: Option<&Path>,
) -> Result<ShotChart, ChartError> {
    let selected = filter_shots(shots, &ShotFilter::new().player_name(player_name));
    let Some(full_name) = selected.iter().find_map(|s| s.player_name.clone()) else {
        return Err(ChartError::NoShots(format!("player: {player_name}")));
    };
    let options = if options.title.is_some() {
        options
    } else {
        options.titled(full_name)
    };
    finish_chart(&selected, options, output)
}

/// Chart of one team's shots, or of the whole table when `team` is `None`.
pub fn team_shot_chart(
    shots: &ShotTable,
    team: Option<&str>,
    options: ChartOptions,
    output: Option<&Path>,
) -> Result<ShotChart, ChartError> {
    let (selected, default_title) = match team {
        Some(team) => (
            filter_shots(shots, &ShotFilter::new().team(team)),
            format!("{team} Shot Chart"),
        ),
        None => (shots.clone(), "Shot Chart".to_string()),
    };
    if selected.is_empty() {
        return Err(ChartError::NoShots(format!(
            "team: {}",
            team.unwrap_or("(any)")
        )));
    }
    let options = if options.title.is_some() {
        options
    } else {
        options.titled(default_title)
    };
    finish_chart(&selected, options, output)
}

fn finish_chart(
    shots: &ShotTable,
    options: ChartOptions,
    output: Option<&Path>,
) -> Result<ShotChart, ChartError> {
    let mut chart = ShotChart::new(shots, options);
    chart.plot();
    if let Some(path) = output {
        chart.save(path, &SaveOptions::default())?;
    }
    Ok(chart)
}

struct Mapper {
    view: ViewBounds,
    scale: f64,
    left: f64,
    top: f64,
}

impl Mapper {
    fn px(&self, p: Point) -> (f64, f64) {
        (
            self.left + (p.x - self.view.x_min) * self.scale,
            self.top + (self.view.y_max - p.y) * self.scale,
        )
    }

    fn path(&self, points: &[Point]) -> String {
        let mut d = String::new();
        for (i, p) in points.iter().enumerate() {
            let (x, y) = self.px(*p);
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{cmd}{x:.2},{y:.2} ");
        }
        d.trim_end().to_string()
    }
}

fn draw_court(out: &mut String, geometry: &CourtGeometry, map: &Mapper, opts: &ChartOptions) {
    let stroke = opts.line_width * PT / 2.0;
    for marking in &geometry.markings {
        let dash = match marking.style {
            LineStyle::Solid => String::new(),
            LineStyle::Dashed => format!(
                r#" stroke-dasharray="{:.1},{:.1}""#,
                4.0 * stroke,
                2.5 * stroke
            ),
        };
        let fill = if marking.filled {
            opts.line_color.as_str()
        } else {
            "none"
        };
        match marking.shape {
            Shape::Circle { center, radius } => {
                let (cx, cy) = map.px(center);
                let _ = writeln!(
                    out,
                    r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{:.2}" fill="{fill}" stroke="{}" stroke-width="{stroke:.2}"{dash}/>"#,
                    radius * map.scale,
                    opts.line_color
                );
            }
            shape => {
                let width = if marking.filled { stroke * 1.5 } else { stroke };
                let _ = writeln!(
                    out,
                    r#"<path d="{}" fill="none" stroke="{}" stroke-width="{width:.2}"{dash}/>"#,
                    map.path(&shape.points(ARC_STEP_DEG)),
                    opts.line_color
                );
            }
        }
    }
}

fn draw_shots(out: &mut String, shots: &ShotTable, map: &Mapper, opts: &ChartOptions, radius: f64) {
    for shot in shots {
        let Some((x, y)) = shot.location() else {
            continue;
        };
        let (px, py) = map.px(Point::new(x, y));
        match shot.shot_made {
            ShotMade::Made => made_marker(out, px, py, radius, &opts.made_color),
            ShotMade::Missed => missed_marker(out, px, py, radius, &opts.missed_color),
            ShotMade::Unknown => {}
        }
    }
}

fn made_marker(out: &mut String, x: f64, y: f64, r: f64, color: &str) {
    let _ = writeln!(
        out,
        r#"<circle cx="{x:.2}" cy="{y:.2}" r="{r:.2}" fill="{color}" fill-opacity="{SHOT_MARKER_ALPHA}" stroke="black" stroke-width="0.5"/>"#
    );
}

fn missed_marker(out: &mut String, x: f64, y: f64, r: f64, color: &str) {
    let _ = writeln!(
        out,
        r#"<path d="M{:.2},{:.2} L{:.2},{:.2} M{:.2},{:.2} L{:.2},{:.2}" stroke="{color}" stroke-opacity="{SHOT_MARKER_ALPHA}" stroke-width="{:.2}" stroke-linecap="round"/>"#,
        x - r,
        y - r,
        x + r,
        y + r,
        x - r,
        y + r,
        x + r,
        y - r,
        r * 0.6
    );
}

fn draw_legend(
    out: &mut String,
    summary: &ShotSummary,
    map: &Mapper,
    opts: &ChartOptions,
    radius: f64,
) {
    let (right, top) = map.px(Point::new(map.view.x_max, map.view.y_max));
    let box_w = 130.0;
    let box_h = 56.0;
    let x = right - box_w - 10.0;
    let y = top + 10.0;
    let _ = writeln!(
        out,
        r#"<rect x="{x:.2}" y="{y:.2}" width="{box_w}" height="{box_h}" fill="white" fill-opacity="0.9" stroke="gray" rx="4"/>"#
    );
    made_marker(out, x + 18.0, y + 18.0, radius, &opts.made_color);
    missed_marker(out, x + 18.0, y + 40.0, radius, &opts.missed_color);
    for (dy, label) in [
        (18.0, format!("Made: {}", summary.made_shots)),
        (40.0, format!("Missed: {}", summary.missed_shots)),
    ] {
        let _ = writeln!(
            out,
            r#"<text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="{:.1}" dominant-baseline="middle">{label}</text>"#,
            x + 34.0,
            y + dy,
            10.0 * PT
        );
    }
}

fn compose_document(figure: &Figure, save: &SaveOptions) -> String {
    let (vx, vy, vw, vh) = if save.tight {
        let (x0, y0, x1, y1) = figure.content;
        (x0, y0, x1 - x0, y1 - y0)
    } else {
        (0.0, 0.0, figure.width, figure.height)
    };
    let px_per_unit = f64::from(save.dpi) / UNITS_PER_INCH;
    let mut doc = String::new();
    let _ = writeln!(
        doc,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="{vx:.2} {vy:.2} {vw:.2} {vh:.2}">"#,
        vw * px_per_unit,
        vh * px_per_unit
    );
    let _ = writeln!(
        doc,
        r#"<rect x="{vx:.2}" y="{vy:.2}" width="{vw:.2}" height="{vh:.2}" fill="{}"/>"#,
        save.background
    );
    doc.push_str(&figure.body);
    doc.push_str("</svg>\n");
    doc
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::escape_xml;

    #[test]
    fn apostrophes_in_names_are_escaped() {
        assert_eq!(escape_xml("De'Aaron Fox"), "De&apos;Aaron Fox");
        assert_eq!(escape_xml("a<b&c"), "a&lt;b&amp;c");
    }
}
