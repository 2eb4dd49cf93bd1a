//! AI case-analysis export.
//!
//! Serializes a structured analysis result into sequential heading and
//! body blocks using the same page-break primitive as the case report
//! (no tables, no images, no markdown), then round-trips the rendered
//! document through the upload collaborator so it surfaces in the file
//! gallery's analysis group.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use advokit_core::{
    Error, FileStore, Incident, LogCache, LogCategory, Notifier, Result, ToastVariant,
    UploadRequest,
};

use crate::cleantext::clean_text;
use crate::config::ReportConfig;
use crate::layout::PageCursor;
use crate::pdf::{line_height_mm, Color, Font};

const TITLE_COLOR: Color = Color(15, 23, 42);
const BODY_COLOR: Color = Color(30, 41, 59);
const MUTED_COLOR: Color = Color(100, 116, 139);

// =============================================================================
// ANALYSIS MODEL
// =============================================================================

/// Overall strength of the tenant's case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStrength {
    Strong,
    Moderate,
    Weak,
}

impl CaseStrength {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Strong => "Strong case",
            Self::Moderate => "Moderate case",
            Self::Weak => "Weak case",
        }
    }
}

impl std::fmt::Display for CaseStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strong => write!(f, "strong"),
            Self::Moderate => write!(f, "moderate"),
            Self::Weak => write!(f, "weak"),
        }
    }
}

/// One suspected housing-code violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub code: String,
    pub description: String,
    /// Free-form severity tag from the analysis backend (e.g. "high").
    pub severity: String,
}

/// Structured result of an AI case analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseAnalysis {
    pub summary: String,
    /// Evidence strength on a 0-10 scale.
    pub evidence_score: u8,
    pub recommendation: CaseStrength,
    #[serde(default)]
    pub violations: Vec<Violation>,
    pub timeline_analysis: String,
    #[serde(default)]
    pub next_steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strengths: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weaknesses: Option<Vec<String>>,
}

// =============================================================================
// RENDERER
// =============================================================================

/// Renders a [`CaseAnalysis`] into a paginated document.
pub struct AnalysisExporter {
    config: ReportConfig,
}

impl AnalysisExporter {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Render the analysis document. No assets are involved, so the
    /// render itself cannot fail.
    pub fn render(&self, incident: &Incident, analysis: &CaseAnalysis) -> Vec<u8> {
        let mut cursor = PageCursor::new(self.config.clone());
        let x = cursor.left();
        let width = cursor.content_width();

        cursor.paragraph(
            "Case Analysis Report",
            x,
            width,
            Font::HelveticaBold,
            18.0,
            TITLE_COLOR,
        );
        cursor.paragraph(
            &clean_text(&incident.title),
            x,
            width,
            Font::Helvetica,
            11.0,
            MUTED_COLOR,
        );
        cursor.ensure_room(line_height_mm(8.5));
        cursor.text_line(
            &format!("Generated {}", Utc::now().format("%b %d, %Y")),
            x,
            Font::Helvetica,
            8.5,
            MUTED_COLOR,
        );
        cursor.advance(4.0);

        self.section(&mut cursor, "Summary", &analysis.summary);
        self.section(
            &mut cursor,
            "Evidence Score",
            &format!("{}/10", analysis.evidence_score),
        );
        self.section(
            &mut cursor,
            "Recommendation",
            analysis.recommendation.label(),
        );

        if !analysis.violations.is_empty() {
            self.heading(&mut cursor, "Violations Found");
            for violation in &analysis.violations {
                let lead = format!(
                    "{} ({})",
                    clean_text(&violation.code),
                    violation.severity.to_uppercase()
                );
                cursor.ensure_room(line_height_mm(self.config.body_size) * 2.0);
                cursor.text_line(&lead, x, Font::HelveticaBold, self.config.body_size, BODY_COLOR);
                cursor.paragraph(
                    &clean_text(&violation.description),
                    x,
                    width,
                    Font::Helvetica,
                    self.config.body_size,
                    BODY_COLOR,
                );
                cursor.advance(1.5);
            }
            cursor.advance(2.0);
        }

        self.section(&mut cursor, "Timeline Analysis", &analysis.timeline_analysis);

        if !analysis.next_steps.is_empty() {
            self.heading(&mut cursor, "Recommended Next Steps");
            for (i, step) in analysis.next_steps.iter().enumerate() {
                let line = format!("{}. {}", i + 1, clean_text(step));
                cursor.paragraph(&line, x, width, Font::Helvetica, self.config.body_size, BODY_COLOR);
            }
            cursor.advance(2.0);
        }

        if let Some(strengths) = analysis.strengths.as_deref().filter(|s| !s.is_empty()) {
            self.factor_list(&mut cursor, "Case Strengths", strengths);
        }
        if let Some(weaknesses) = analysis.weaknesses.as_deref().filter(|w| !w.is_empty()) {
            self.factor_list(&mut cursor, "Case Weaknesses", weaknesses);
        }

        cursor.into_pdf().render()
    }

    fn heading(&self, cursor: &mut PageCursor, title: &str) {
        cursor.advance(2.0);
        cursor.ensure_room(line_height_mm(13.0) + 4.0);
        let x = cursor.left();
        cursor.text_line(title, x, Font::HelveticaBold, 13.0, TITLE_COLOR);
        cursor.advance(1.5);
    }

    fn section(&self, cursor: &mut PageCursor, title: &str, body: &str) {
        self.heading(cursor, title);
        let x = cursor.left();
        let width = cursor.content_width();
        cursor.paragraph(
            &clean_text(body),
            x,
            width,
            Font::Helvetica,
            self.config.body_size,
            BODY_COLOR,
        );
        cursor.advance(2.0);
    }

    fn factor_list(&self, cursor: &mut PageCursor, title: &str, items: &[String]) {
        self.heading(cursor, title);
        let x = cursor.left();
        let width = cursor.content_width();
        for item in items {
            let line = format!("- {}", clean_text(item));
            cursor.paragraph(&line, x, width, Font::Helvetica, self.config.body_size, BODY_COLOR);
        }
        cursor.advance(2.0);
    }
}

// =============================================================================
// EXPORT FLOW
// =============================================================================

fn analysis_filename(incident: &Incident) -> String {
    format!("case-analysis-{}.pdf", incident.id)
}

/// Render an analysis, upload it tagged `analysis_pdf`, and invalidate
/// the incident's log cache so the new document surfaces in the gallery.
///
/// The cache is invalidated only after a successful upload; failure at
/// any step surfaces one failure toast and leaves the cache untouched.
pub async fn export_case_analysis(
    exporter: &AnalysisExporter,
    incident: &Incident,
    analysis: &CaseAnalysis,
    store: &dyn FileStore,
    cache: &dyn LogCache,
    notifier: &dyn Notifier,
) -> Result<()> {
    let outcome = async {
        let bytes = exporter.render(incident, analysis);
        let uploaded = store
            .upload(UploadRequest {
                filename: analysis_filename(incident),
                content_type: "application/pdf".to_string(),
                category: LogCategory::AnalysisPdf.as_str().to_string(),
                bytes,
            })
            .await?;
        cache.invalidate(incident.id).await?;
        Ok::<_, Error>(uploaded)
    }
    .await;

    match outcome {
        Ok(uploaded) => {
            info!(
                incident_id = %incident.id,
                file_url = %uploaded.file_url,
                "analysis report uploaded"
            );
            notifier.notify(
                "Analysis exported",
                Some("The analysis PDF was added to your case files."),
                ToastVariant::Info,
            );
            Ok(())
        }
        Err(e) => {
            error!(incident_id = %incident.id, error = %e, "analysis export failed");
            notifier.notify(
                "Export failed",
                Some("The analysis PDF could not be saved. Please try again."),
                ToastVariant::Error,
            );
            Err(e)
        }
    }
}
