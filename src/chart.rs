// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Error, Series};

use plotters::coord::ranged1d::{KeyPointHint, NoDefaultFormatting, Ranged, ValueFormatter};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;

use std::f64::consts::{FRAC_1_SQRT_2, PI};
use std::ops::Range;
use std::path::Path;

macro_rules! hexcolour {
    ($colour:literal) => {
        RGBColor(
            (($colour & 0xFF0000) >> 16) as u8,
            (($colour & 0x00FF00) >> 8) as u8,
            ($colour & 0x0000FF) as u8,
        )
    };
}

const COLOURS: &[RGBColor] = &[
    hexcolour!(0x4C72B0),
    hexcolour!(0xDD8452),
    hexcolour!(0x55A868),
    hexcolour!(0xC44E52),
    hexcolour!(0x8172B3),
    hexcolour!(0x937860),
    hexcolour!(0xDA8BC3),
    hexcolour!(0x8C8C8C),
    hexcolour!(0xCCB974),
    hexcolour!(0x64B5CD),
];

const MARKERS: &[Marker] = &[
    Marker::Circle,
    Marker::Cross,
    Marker::Square,
    Marker::Triangle,
    Marker::Diamond,
    Marker::Plus,
];

const FONT: &str = "sans-serif";
const MARKER_SIZE: i32 = 4;
const LEGEND_WIDTH: i32 = 20;

/// fraction of the data span left empty on each side of an axis
const X_MARGIN: f64 = 0.03;
const Y_MARGIN: f64 = 0.05;

/// Shape drawn at every point of a line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Cross,
    Diamond,
    Plus,
    Square,
    Triangle,
}

impl Marker {
    /// Marker for the `i`-th line of a chart.
    pub fn nth(i: usize) -> Self {
        MARKERS[i % MARKERS.len()]
    }

    /// Polygon outline centered on the origin, in pixels.
    pub fn outline(self, size: i32) -> Vec<(i32, i32)> {
        let s = size as f64;
        let points = match self {
            Marker::Circle => (0..16)
                .map(|i| {
                    let a = i as f64 * PI / 8.0;
                    (s * a.cos(), s * a.sin())
                })
                .collect(),
            Marker::Square => {
                let h = s * 0.8;
                vec![(-h, -h), (h, -h), (h, h), (-h, h)]
            }
            Marker::Diamond => vec![(0.0, -s), (s, 0.0), (0.0, s), (-s, 0.0)],
            Marker::Triangle => vec![(0.0, -s), (s, s * 0.75), (-s, s * 0.75)],
            Marker::Plus => plus(s),
            Marker::Cross => plus(s)
                .into_iter()
                .map(|(x, y)| ((x - y) * FRAC_1_SQRT_2, (x + y) * FRAC_1_SQRT_2))
                .collect(),
        };
        points
            .into_iter()
            .map(|(x, y): (f64, f64)| (x.round() as i32, y.round() as i32))
            .collect()
    }
}

fn plus(s: f64) -> Vec<(f64, f64)> {
    let t = s / 3.0;
    vec![
        (-t, -s),
        (t, -s),
        (t, -t),
        (s, -t),
        (s, t),
        (t, t),
        (t, s),
        (-t, s),
        (-t, t),
        (-s, t),
        (-s, -t),
        (-t, -t),
    ]
}

/// A linear axis whose only key points are the given ticks.
struct TickAxis {
    range: RangedCoordf64,
    ticks: Vec<f64>,
}

impl TickAxis {
    fn new(range: Range<f64>, ticks: &[f64]) -> Self {
        Self {
            range: range.into(),
            ticks: ticks.to_vec(),
        }
    }
}

impl Ranged for TickAxis {
    type FormatOption = NoDefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.range.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, _hint: Hint) -> Vec<f64> {
        self.ticks.clone()
    }

    fn range(&self) -> Range<f64> {
        self.range.range()
    }
}

impl ValueFormatter<f64> for TickAxis {
    fn format(value: &f64) -> String {
        format_tick(value)
    }
}

/// Renders one line per series into an SVG document.
pub struct Chart {
    caption: Option<String>,
    x_desc: String,
    y_desc: String,
    size: (u32, u32),
    x_ticks: Vec<f64>,
    y_ticks: Vec<f64>,
}

impl Default for Chart {
    fn default() -> Self {
        Self {
            caption: None,
            x_desc: String::new(),
            y_desc: String::new(),
            size: (800, 500),
            x_ticks: Vec::new(),
            y_ticks: Vec::new(),
        }
    }
}

impl Chart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn caption(&mut self, caption: impl AsRef<str>) -> &mut Self {
        self.caption = Some(caption.as_ref().to_owned());
        self
    }

    /// x axis label, line breaks are folded into spaces
    pub fn x_desc(&mut self, x_desc: impl AsRef<str>) -> &mut Self {
        self.x_desc = single_line(x_desc.as_ref());
        self
    }

    /// y axis label, line breaks are folded into spaces
    pub fn y_desc(&mut self, y_desc: impl AsRef<str>) -> &mut Self {
        self.y_desc = single_line(y_desc.as_ref());
        self
    }

    pub fn size(&mut self, size: (u32, u32)) -> &mut Self {
        self.size = size;
        self
    }

    pub fn x_ticks(&mut self, ticks: Vec<f64>) -> &mut Self {
        self.x_ticks = ticks;
        self
    }

    pub fn y_ticks(&mut self, ticks: Vec<f64>) -> &mut Self {
        self.y_ticks = ticks;
        self
    }

    /// Render to an in-memory SVG document.
    pub fn render(&self, series: &[Series]) -> Result<String, Error> {
        let mut svg = String::new();
        self.draw(&mut svg, series)
            .map_err(|e| Error::Render(e.to_string()))?;
        Ok(svg)
    }

    /// Render and write the SVG document to `path`. Nothing is written if
    /// rendering fails.
    pub fn save(&self, series: &[Series], path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let svg = self.render(series)?;
        std::fs::write(path, svg).map_err(|source| Error::WriteOutput {
            path: path.to_path_buf(),
            source,
        })
    }

    fn draw(&self, svg: &mut String, series: &[Series]) -> Result<(), Box<dyn std::error::Error>> {
        let root = SVGBackend::with_string(svg, self.size).into_drawing_area();
        root.fill(&WHITE)?;

        let x_values = series.iter().flat_map(|s| s.points.iter().map(|p| p.x));
        let y_values = series.iter().flat_map(|s| {
            s.points.iter().flat_map(|p| {
                let (lo, hi) = p.band.unwrap_or((p.y, p.y));
                vec![p.y, lo, hi]
            })
        });
        let x_range = axis_range(&self.x_ticks, x_values, X_MARGIN);
        let y_range = axis_range(&self.y_ticks, y_values, Y_MARGIN);

        let mut builder = ChartBuilder::on(&root);
        builder
            .margin(20)
            .set_label_area_size(LabelAreaPosition::Left, 90)
            .set_label_area_size(LabelAreaPosition::Bottom, 50);
        if let Some(caption) = &self.caption {
            builder.caption(caption, (FONT, 22).into_font());
        }

        let mut chart = builder.build_cartesian_2d(
            TickAxis::new(x_range, &self.x_ticks),
            TickAxis::new(y_range, &self.y_ticks),
        )?;

        chart
            .configure_mesh()
            .x_desc(self.x_desc.as_str())
            .y_desc(self.y_desc.as_str())
            .axis_desc_style((FONT, 16).into_font())
            .label_style((FONT, 13).into_font())
            .bold_line_style(&BLACK.mix(0.1))
            .draw()?;

        // all bands below all lines
        for (i, s) in series.iter().enumerate() {
            if s.points.iter().all(|p| p.band.is_none()) {
                continue;
            }
            let colour = COLOURS[i % COLOURS.len()];
            let upper = s
                .points
                .iter()
                .map(|p| (p.x, p.band.map(|(_, hi)| hi).unwrap_or(p.y)));
            let lower = s
                .points
                .iter()
                .rev()
                .map(|p| (p.x, p.band.map(|(lo, _)| lo).unwrap_or(p.y)));
            let outline: Vec<(f64, f64)> = upper.chain(lower).collect();
            chart.draw_series(std::iter::once(Polygon::new(
                outline,
                colour.mix(0.2).filled(),
            )))?;
        }

        for (i, s) in series.iter().enumerate() {
            let colour = COLOURS[i % COLOURS.len()];
            let marker = Marker::nth(i);

            chart
                .draw_series(LineSeries::new(
                    s.points.iter().map(|p| (p.x, p.y)),
                    colour.stroke_width(2),
                ))?
                .label(s.label.as_str())
                .legend(move |(x, y)| {
                    let glyph: Vec<(i32, i32)> = marker
                        .outline(MARKER_SIZE)
                        .into_iter()
                        .map(|(dx, dy)| (dx + LEGEND_WIDTH / 2, dy))
                        .collect();
                    EmptyElement::at((x, y))
                        + PathElement::new(vec![(0, 0), (LEGEND_WIDTH, 0)], colour.stroke_width(2))
                        + Polygon::new(glyph, colour.filled())
                });

            chart.draw_series(s.points.iter().map(|p| {
                EmptyElement::at((p.x, p.y))
                    + Polygon::new(marker.outline(MARKER_SIZE), colour.filled())
            }))?;
        }

        if !series.is_empty() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK.mix(0.3))
                .label_font((FONT, 13).into_font())
                .draw()?;
        }

        root.present()?;
        Ok(())
    }
}

fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whole numbers print without a decimal point, everything else with one
/// decimal, matching the resolution of the tick generator.
fn format_tick(value: &f64) -> String {
    let value = if value.abs() < 1e-9 { 0.0 } else { *value };
    if (value * 10.0).round() % 10.0 == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Smallest range covering the ticks and the values, padded on both ends.
fn axis_range(ticks: &[f64], values: impl Iterator<Item = f64>, margin: f64) -> Range<f64> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in ticks.iter().copied().chain(values) {
        if v.is_finite() {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }

    if lo > hi {
        return 0.0..1.0;
    }
    if (hi - lo).abs() < f64::EPSILON {
        return (lo - 0.5)..(hi + 0.5);
    }

    let pad = (hi - lo) * margin;
    (lo - pad)..(hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    fn series() -> Vec<Series> {
        vec![
            Series {
                label: "record4s %".to_string(),
                points: vec![
                    Point {
                        x: 2.0,
                        y: 100.0,
                        band: Some((90.0, 110.0)),
                    },
                    Point {
                        x: 4.0,
                        y: 180.0,
                        band: None,
                    },
                ],
            },
            Series {
                label: "Scala 3 case class".to_string(),
                points: vec![
                    Point {
                        x: 2.0,
                        y: 40.0,
                        band: None,
                    },
                    Point {
                        x: 4.0,
                        y: 60.0,
                        band: None,
                    },
                ],
            },
        ]
    }

    #[test]
    fn tick_labels() {
        assert_eq!(format_tick(&0.0), "0");
        assert_eq!(format_tick(&-0.0), "0");
        assert_eq!(format_tick(&500.0), "500");
        assert_eq!(format_tick(&0.5), "0.5");
        assert_eq!(format_tick(&2.0), "2");
        assert_eq!(format_tick(&-1.5), "-1.5");
    }

    #[test]
    fn ranges_cover_ticks_and_data() {
        let r = axis_range(&[0.0, 50.0, 100.0], vec![20.0, 120.0].into_iter(), 0.0);
        assert_eq!(r, 0.0..120.0);

        let r = axis_range(&[], vec![3.0].into_iter(), 0.05);
        assert_eq!(r, 2.5..3.5);

        let r = axis_range(&[], std::iter::empty(), 0.05);
        assert_eq!(r, 0.0..1.0);
    }

    #[test]
    fn labels_are_single_line() {
        assert_eq!(
            single_line("Compilation time [s]\n(record creation and all field access)"),
            "Compilation time [s] (record creation and all field access)"
        );
    }

    #[test]
    fn markers_are_distinct_and_bounded() {
        for (i, a) in MARKERS.iter().enumerate() {
            let outline = a.outline(MARKER_SIZE);
            assert!(outline.len() >= 3);
            assert!(outline
                .iter()
                .all(|(x, y)| x.abs() <= MARKER_SIZE && y.abs() <= MARKER_SIZE));
            for b in &MARKERS[i + 1..] {
                assert_ne!(a.outline(MARKER_SIZE), b.outline(MARKER_SIZE));
            }
        }
        assert_eq!(Marker::nth(0), Marker::nth(MARKERS.len()));
    }

    #[test]
    fn render_svg() {
        let mut chart = Chart::new();
        chart
            .x_desc("Record size")
            .y_desc("Creation time [ns]")
            .x_ticks(vec![2.0, 4.0])
            .y_ticks(vec![0.0, 50.0, 100.0, 150.0]);
        let svg = chart.render(&series()).unwrap();

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Record size"));
        assert!(svg.contains("Creation time [ns]"));
        assert!(svg.contains("record4s %"));
        assert!(svg.contains("Scala 3 case class"));
    }

    /// trimmed contents of every `<text>` element
    fn text_labels(svg: &str) -> Vec<String> {
        svg.split("<text")
            .skip(1)
            .filter_map(|element| {
                let start = element.find('>')? + 1;
                let end = element.find("</text>")?;
                Some(element[start..end].trim().to_string())
            })
            .collect()
    }

    #[test]
    fn tick_labels_are_exactly_the_ticks() {
        let mut chart = Chart::new();
        chart
            .x_ticks(vec![2.0, 4.0, 6.0])
            .y_ticks(vec![0.0, 0.5, 1.0, 1.5]);
        let series = vec![Series {
            label: "shapeless Record".to_string(),
            points: vec![
                Point {
                    x: 2.0,
                    y: 0.2,
                    band: None,
                },
                Point {
                    x: 6.5,
                    y: 1.7,
                    band: None,
                },
            ],
        }];
        let svg = chart.render(&series).unwrap();

        let mut numeric: Vec<String> = text_labels(&svg)
            .into_iter()
            .filter(|label| label.parse::<f64>().is_ok())
            .collect();
        numeric.sort();
        assert_eq!(numeric, vec!["0", "0.5", "1", "1.5", "2", "4", "6"]);
        assert!(text_labels(&svg).contains(&"shapeless Record".to_string()));
    }

    #[test]
    fn render_without_series() {
        let svg = Chart::new().render(&[]).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn save_to_missing_directory() {
        let e = Chart::new()
            .save(&series(), "/nonexistent/dir/chart.svg")
            .unwrap_err();
        assert!(matches!(e, Error::WriteOutput { .. }));
    }
}
