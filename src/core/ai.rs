use serde::{Deserialize, Serialize};

use crate::core::models::stats::OrganisasiStats;
use crate::error::Error;

pub trait Generator {
    async fn generate(&self, prompt: &str) -> Result<String, Error>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub title: String,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Serialize)]
pub struct Recommendation {
    pub html: String,
}

/// Removes one markdown code fence around `text`, if present.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = match rest.find('\n') {
        Some(nl) if rest[..nl].trim().chars().all(|c| c.is_ascii_alphanumeric()) => &rest[nl + 1..],
        _ => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

pub fn parse_chart_points(text: &str) -> Result<Vec<ChartPoint>, Error> {
    let body = strip_code_fence(text);
    let points: Vec<ChartPoint> = serde_json::from_str(body).map_err(|e| Error::AiResponse(format!("chart data is not a valid point list: {}", e)))?;
    if points.is_empty() {
        return Err(Error::AiResponse("chart data is empty".into()));
    }
    for (i, p) in points.iter().enumerate() {
        if p.label.trim().is_empty() {
            return Err(Error::AiResponse(format!("chart point {} has an empty label", i)));
        }
        if !p.value.is_finite() || p.value < 0.0 {
            return Err(Error::AiResponse(format!("chart point {} has an invalid value({})", i, p.value)));
        }
    }
    Ok(points)
}

fn has_tag(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        b == b'<' && bytes.get(i + 1).map_or(false, |n| n.is_ascii_alphabetic() || *n == b'/') && s[i..].contains('>')
    })
}

pub fn parse_recommendation_html(text: &str) -> Result<String, Error> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(Error::AiResponse("recommendation is empty".into()));
    }
    if !has_tag(body) {
        return Err(Error::AiResponse("recommendation is not HTML".into()));
    }
    if body.to_ascii_lowercase().contains("<script") {
        return Err(Error::AiResponse("recommendation contains a script block".into()));
    }
    Ok(body.to_owned())
}

pub fn recommendation_prompt(stats: &OrganisasiStats) -> Result<String, Error> {
    let data = serde_json::to_string_pretty(stats)?;
    Ok(format!(
        "Kamu adalah konsultan kegiatan kemahasiswaan. Berikut statistik organisasi \"{}\" dalam format JSON:\n{}\n\n\
         Tuliskan rekomendasi singkat untuk meningkatkan kualitas event dan partisipasi mahasiswa. \
         Jawab hanya dengan potongan HTML (gunakan <h3>, <p>, <ul>, <li>), tanpa <script>, tanpa penjelasan tambahan.",
        stats.organisasi_name, data
    ))
}

pub fn report_prompt(stats: &OrganisasiStats) -> Result<String, Error> {
    let data = serde_json::to_string_pretty(stats)?;
    Ok(format!(
        "Berikut statistik event organisasi \"{}\" dalam format JSON:\n{}\n\n\
         Buat data grafik jumlah peserta yang diterima per event. \
         Jawab hanya dengan array JSON berbentuk [{{\"label\": \"<judul event>\", \"value\": <angka>}}], tanpa teks lain.",
        stats.organisasi_name, data
    ))
}

pub fn report_title(stats: &OrganisasiStats) -> String {
    format!("Laporan partisipasi {}", stats.organisasi_name)
}
