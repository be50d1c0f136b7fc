use athena_core::{AthenaError, Result};
use athena_curve::{evaluate_batch, CurveRequest, EvaluatedCurve, KnotType, KnotVector};
use athena_plot::Figure;
use log::{debug, info};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A request file holds one request object or an array of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RequestFile {
    One(CurveRequest),
    Many(Vec<CurveRequest>),
}

impl RequestFile {
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn into_requests(self) -> Vec<CurveRequest> {
        match self {
            RequestFile::One(request) => vec![request],
            RequestFile::Many(requests) => requests,
        }
    }
}

/// Evaluate every request, failing on the first invalid one.
pub fn evaluate_file(path: &Path) -> Result<Vec<EvaluatedCurve>> {
    let requests = RequestFile::read(path)?.into_requests();
    info!("Evaluating {} curve(s) from {}", requests.len(), path.display());
    evaluate_batch(&requests)
        .into_iter()
        .enumerate()
        .map(|(i, result)| {
            result.map_err(|e| {
                debug!("request {} rejected: {}", i, e);
                e
            })
        })
        .collect()
}

/// Output path for curve `index` of `count`: the base path itself for a single curve,
/// `stem-<index>.<ext>` otherwise.
pub fn numbered_path(base: &Path, index: usize, count: usize) -> PathBuf {
    if count <= 1 {
        return base.to_path_buf();
    }
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "curve".into());
    let mut name = format!("{}-{}", stem, index);
    if let Some(ext) = base.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    base.with_file_name(name)
}

/// Write one Plotly HTML page per curve. Returns the written paths.
pub fn export_html(input: &Path, output: &Path) -> Result<Vec<PathBuf>> {
    let curves = evaluate_file(input)?;
    curves
        .iter()
        .enumerate()
        .map(|(i, curve)| {
            let path = numbered_path(output, i, curves.len());
            Figure::from_curve(curve).export_html(&path)?;
            Ok(path)
        })
        .collect()
}

/// Sampled curves as pretty JSON: an object for a single request, an array otherwise.
pub fn export_json(input: &Path) -> Result<String> {
    let mut curves = evaluate_file(input)?;
    let json = if curves.len() == 1 {
        serde_json::to_string_pretty(&curves.remove(0))?
    } else {
        serde_json::to_string_pretty(&curves)?
    };
    Ok(json)
}

/// The generated knot vector in its `[0, 1, 2, ...]` form.
pub fn knot_vector(point_count: usize, degree: usize, knot_type: KnotType) -> Result<String> {
    if knot_type == KnotType::Custom {
        return Err(AthenaError::InvalidKnotVectorContent(
            "custom knot vectors are supplied, not generated".into(),
        ));
    }
    Ok(KnotVector::build(knot_type, point_count, degree, None)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CUBIC: &str = r#"{"curve": "bezier", "points": [[0, 0], [1, 2], [3, 2], [4, 0]]}"#;

    fn write_request(dir: &Path, text: &str) -> PathBuf {
        let path = dir.join("request.json");
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_single_request_html() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_request(dir.path(), CUBIC);
        let output = dir.path().join("cubic.html");

        let written = export_html(&input, &output).unwrap();
        assert_eq!(written, vec![output.clone()]);
        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains("2D Bezier Curve Using Given Control Points"));
    }

    #[test]
    fn test_request_array_html() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_request(
            dir.path(),
            r#"[
                {"curve": "bezier", "points": [[0, 0], [1, 1]]},
                {"curve": "bspline", "points": [[0, 0, 0], [1, 1, 1], [2, 0, 0]], "knots": "uniform_open"}
            ]"#,
        );
        let written = export_html(&input, &dir.path().join("out.html")).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written[0].ends_with("out-0.html"));
        assert!(written[1].ends_with("out-1.html"));
        assert!(written.iter().all(|p| p.exists()));
    }

    #[test]
    fn test_json_export() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_request(dir.path(), CUBIC);
        let json: serde_json::Value = serde_json::from_str(&export_json(&input).unwrap()).unwrap();
        assert_eq!(json["kind"], "bezier");
        assert_eq!(json["curve"]["points"].as_array().unwrap().len(), 101);
    }

    #[test]
    fn test_invalid_request_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_request(
            dir.path(),
            r#"{"curve": "bezier", "points": [[0, 0], [1, 1], [2, 2], [3, 3], [4, 4], [5, 5]]}"#,
        );
        assert!(matches!(
            export_json(&input),
            Err(AthenaError::UnsupportedDegree { degree: 5 })
        ));

        let input = write_request(
            dir.path(),
            r#"{"curve": "bezier", "points": [[0, 0], [1, 1]], "samples": 1000000000000}"#,
        );
        assert!(matches!(export_json(&input), Err(AthenaError::IndexRange(_))));

        let input = write_request(dir.path(), "{not json");
        assert!(matches!(export_json(&input), Err(AthenaError::Json(_))));

        assert!(matches!(
            export_json(&dir.path().join("missing.json")),
            Err(AthenaError::Io(_))
        ));
    }

    #[test]
    fn test_knot_vector_text() {
        assert_eq!(knot_vector(4, 2, KnotType::Uniform).unwrap(), "[0, 1, 2, 3, 4, 5, 6]");
        assert_eq!(knot_vector(4, 2, KnotType::UniformOpen).unwrap(), "[2, 2, 2, 3, 4, 4, 4]");
        assert!(knot_vector(4, 2, KnotType::Custom).is_err());
        assert!(matches!(
            knot_vector(4, 4, KnotType::Uniform),
            Err(AthenaError::IndexRange(_))
        ));
    }

    #[test]
    fn test_numbered_path() {
        let base = Path::new("plots/curve.html");
        assert_eq!(numbered_path(base, 0, 1), PathBuf::from("plots/curve.html"));
        assert_eq!(numbered_path(base, 2, 3), PathBuf::from("plots/curve-2.html"));
    }
}
