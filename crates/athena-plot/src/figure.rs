use athena_core::Result;
use athena_curve::EvaluatedCurve;
use athena_math::{Aabb3, DVec3, Point3};
use log::info;
use serde::Serialize;
use serde_json::{json, Value};
use std::io::Write;
use std::path::Path;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// How a trace is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TraceMode {
    #[serde(rename = "lines")]
    Lines,
    #[serde(rename = "markers+lines")]
    MarkersLines,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: String,
    pub size: f64,
}

/// One named polyline of the figure. Coordinates are stored per axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: TraceMode,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<Vec<f64>>,
    pub line: Line,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(rename = "showlegend")]
    pub show_legend: bool,
}

impl Trace {
    /// Build a trace from coordinate lists of length 2 or 3.
    pub fn new(name: &str, mode: TraceMode, coords: &[Vec<f64>], line: Line) -> Self {
        let axis = |i: usize| coords.iter().map(|c| c.get(i).copied().unwrap_or(0.0)).collect();
        let spatial = coords.iter().any(|c| c.len() == 3);
        Self {
            name: name.to_string(),
            kind: if spatial { "scatter3d" } else { "scatter" },
            mode,
            x: axis(0),
            y: axis(1),
            z: spatial.then(|| axis(2)),
            line,
            marker: None,
            show_legend: true,
        }
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn is_spatial(&self) -> bool {
        self.z.is_some()
    }

    fn bounds(&self) -> Option<Aabb3> {
        let points: Vec<Point3> = (0..self.len())
            .map(|i| {
                let z = self.z.as_ref().map_or(0.0, |z| z[i]);
                DVec3::new(self.x[i], self.y[i], z)
            })
            .collect();
        Aabb3::from_points(&points)
    }
}

/// A Plotly figure: a set of traces plus a titled layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    title: String,
    dimension: usize,
    traces: Vec<Trace>,
}

impl Figure {
    pub fn new(title: &str, dimension: usize) -> Self {
        Self {
            title: title.to_string(),
            dimension,
            traces: Vec::new(),
        }
    }

    /// The curve as a thick blue line and its control polygon as red segments with black
    /// markers.
    pub fn from_curve(curve: &EvaluatedCurve) -> Self {
        let dimension = curve.dimension();
        let title = format!("{}D {} Using Given Control Points", dimension, curve.kind);
        let mut figure = Self::new(&title, dimension);

        figure.add_trace(Trace::new(
            &curve.kind.to_string(),
            TraceMode::Lines,
            &curve.points(),
            Line {
                color: "blue".into(),
                width: 3.0,
            },
        ));
        figure.add_trace(
            Trace::new(
                "Control Polynomial",
                TraceMode::MarkersLines,
                &curve.control_points(),
                Line {
                    color: "red".into(),
                    width: 1.0,
                },
            )
            .with_marker(Marker {
                color: "black".into(),
                size: 5.0,
            }),
        );
        figure
    }

    pub fn add_trace(&mut self, trace: Trace) {
        self.traces.push(trace);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    /// Bounds over every trace.
    pub fn bounds(&self) -> Option<Aabb3> {
        self.traces
            .iter()
            .filter_map(Trace::bounds)
            .reduce(|a, b| a.merge(&b))
    }

    /// Axis ranges padded by 5% of the largest extent.
    pub fn axis_ranges(&self) -> Aabb3 {
        let bounds = self
            .bounds()
            .unwrap_or_else(|| Aabb3::new(Point3::ZERO, DVec3::splat(1.0)));
        let size = bounds.extents().max_element();
        let pad = if size > 0.0 { size * 0.05 } else { 1.0 };
        bounds.expand(pad)
    }

    fn layout(&self) -> Value {
        let ranges = self.axis_ranges();
        if self.dimension == 3 {
            json!({
                "title": { "text": self.title },
                "width": 900,
                "height": 600,
                "scene": {
                    "xaxis": { "title": { "text": "X Axis" } },
                    "yaxis": { "title": { "text": "Y Axis" } },
                    "zaxis": { "title": { "text": "Z Axis" } },
                    "aspectmode": "data",
                },
            })
        } else {
            json!({
                "title": { "text": self.title },
                "width": 600,
                "height": 600,
                "xaxis": {
                    "title": { "text": "X Axis" },
                    "range": [ranges.min.x, ranges.max.x],
                },
                "yaxis": {
                    "title": { "text": "Y Axis" },
                    "range": [ranges.min.y, ranges.max.y],
                    "scaleanchor": "x",
                },
            })
        }
    }

    /// `{"data": [...], "layout": {...}}` as accepted by `Plotly.newPlot`.
    pub fn to_plotly_json(&self) -> Result<Value> {
        Ok(json!({
            "data": serde_json::to_value(&self.traces)?,
            "layout": self.layout(),
        }))
    }

    /// Export the figure as a standalone HTML page that loads Plotly from its CDN.
    pub fn export_html(&self, path: &Path) -> Result<()> {
        let figure = serde_json::to_string(&self.to_plotly_json()?)?.replace("</", "<\\/");

        let mut file = std::fs::File::create(path)?;
        write!(
            file,
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Project Athena: {title}</title>
    <style>
        body {{
            margin: 0;
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background: #ffffff;
        }}
        #plot {{
            width: 100vw;
            height: 100vh;
        }}
        #error {{
            position: absolute;
            top: 50%;
            left: 50%;
            transform: translate(-50%, -50%);
            background: rgba(200, 0, 0, 0.9);
            color: white;
            padding: 20px;
            border-radius: 5px;
            display: none;
        }}
    </style>
</head>
<body>
    <div id="plot"></div>
    <div id="error">Failed to load Plotly from CDN. Please check your internet connection.</div>

    <script src="{cdn}"></script>
    <script>
        const figure = {figure};
        if (typeof Plotly === 'undefined') {{
            document.getElementById('error').style.display = 'block';
        }} else {{
            Plotly.newPlot('plot', figure.data, figure.layout, {{ responsive: true }});
        }}
    </script>
</body>
</html>
"#,
            title = self.title,
            cdn = PLOTLY_CDN,
            figure = figure,
        )?;

        info!("Wrote \"{}\" to {}", self.title, path.display());
        Ok(())
    }
}
