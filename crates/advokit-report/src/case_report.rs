//! Paginated case report export.
//!
//! Renders one incident and its evidence log into a multi-page document:
//! header with status badge, optional description, the chronological
//! evidence timeline with inlined images, the AI consultation transcript
//! through the markdown renderer, and a footer pass once the total page
//! count is known. Delivery and outcome reporting go through the
//! collaborator traits.

use std::collections::HashSet;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, warn};

use advokit_core::classify::attached_photos;
use advokit_core::{
    Analytics, Error, ImageFetcher, Incident, IncidentLog, LogCategory, LogId, LogType, Notifier,
    ReportSink, Result, ToastVariant,
};

use crate::cleantext::clean_text;
use crate::config::ReportConfig;
use crate::layout::PageCursor;
use crate::markdown::render_markdown;
use crate::pdf::{line_height_mm, text_width_mm, Color, Font, Pdf, PdfImage};

const TITLE_COLOR: Color = Color(15, 23, 42);
const BODY_COLOR: Color = Color(30, 41, 59);
const MUTED_COLOR: Color = Color(100, 116, 139);
const WHITE: Color = Color(255, 255, 255);
const OPEN_BADGE: Color = Color(22, 163, 74);
const CLOSED_BADGE: Color = Color(100, 116, 139);
const AI_PILL: Color = Color(124, 58, 237);
const USER_PILL: Color = Color(37, 99, 235);

const IMAGE_PLACEHOLDER: &str = "[Image could not be embedded]";

/// How long after an event a parentless categorized photo still counts
/// as attached to it. Legacy rule; `parentLogId` is authoritative.
const ASSOCIATION_WINDOW_SECS: i64 = 60;

/// Log types that appear as evidence timeline entries.
const EVIDENCE_TYPES: [LogType; 5] = [
    LogType::Call,
    LogType::Text,
    LogType::Email,
    LogType::Photo,
    LogType::Service,
];

/// Renders the full case report for one incident.
pub struct CaseReportExporter<F> {
    config: ReportConfig,
    fetcher: F,
}

impl<F: ImageFetcher> CaseReportExporter<F> {
    pub fn new(config: ReportConfig, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    /// Render the report to its final bytes.
    ///
    /// A single image failing to download or decode degrades to a
    /// placeholder line; it never aborts the render.
    pub async fn render(&self, incident: &Incident, logs: &[IncidentLog]) -> Result<Vec<u8>> {
        let started = Instant::now();
        let mut cursor = PageCursor::new(self.config.clone());

        self.render_header(&mut cursor, incident);
        self.render_evidence(&mut cursor, logs).await;
        self.render_consultation(&mut cursor, logs);

        let page_count = cursor.page_count();
        let mut pdf = cursor.into_pdf();
        stamp_footers(&mut pdf, &self.config, Utc::now());
        let bytes = pdf.render();

        info!(
            incident_id = %incident.id,
            log_count = logs.len(),
            page_count,
            document_bytes = bytes.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "rendered case report"
        );
        Ok(bytes)
    }

    /// Title block: wrapped incident title, status badge, creation date,
    /// then the optional description.
    fn render_header(&self, cursor: &mut PageCursor, incident: &Incident) {
        let x = cursor.left();
        let width = cursor.content_width();

        cursor.paragraph(
            &clean_text(&incident.title),
            x,
            width,
            Font::HelveticaBold,
            18.0,
            TITLE_COLOR,
        );
        cursor.advance(2.0);

        let status_text = incident.status.to_string().to_uppercase();
        let badge = if incident.status.is_open() {
            OPEN_BADGE
        } else {
            CLOSED_BADGE
        };
        let date_text = format!("Created {}", format_date(incident.created_at));
        draw_pill(cursor, &status_text, badge, Some(&date_text));
        cursor.advance(3.0);

        if let Some(description) = incident.description.as_deref().filter(|d| !d.trim().is_empty())
        {
            cursor.paragraph(
                &clean_text(description.trim()),
                x,
                width,
                Font::Helvetica,
                self.config.body_size,
                BODY_COLOR,
            );
            cursor.advance(3.0);
        }
    }

    /// Evidence timeline: eligible logs sorted ascending, one entry each.
    async fn render_evidence(&self, cursor: &mut PageCursor, logs: &[IncidentLog]) {
        let mut entries: Vec<&IncidentLog> = logs
            .iter()
            .filter(|l| EVIDENCE_TYPES.contains(&l.log_type))
            .collect();
        entries.sort_by_key(|l| l.created_at);
        if entries.is_empty() {
            return;
        }

        section_heading(cursor, "Evidence Timeline");
        for entry in entries {
            self.render_entry(cursor, entry, logs).await;
        }
    }

    async fn render_entry(&self, cursor: &mut PageCursor, entry: &IncidentLog, logs: &[IncidentLog]) {
        let x = cursor.left();
        let width = cursor.content_width();

        // Keep tag and timestamp on one page together.
        cursor.ensure_room(line_height_mm(self.config.body_size) + line_height_mm(8.5));

        let tag = format!("[{}]", entry.log_type.to_string().to_uppercase());
        let headline = match entry.title.as_deref().filter(|t| !t.is_empty()) {
            Some(title) => format!("{} {}", tag, clean_text(title)),
            None => tag,
        };
        cursor.text_line(&headline, x, Font::HelveticaBold, self.config.body_size, TITLE_COLOR);
        cursor.text_line(
            &format_timestamp(entry.created_at),
            x,
            Font::Helvetica,
            8.5,
            MUTED_COLOR,
        );

        let content = entry.content.trim();
        if !content.is_empty() {
            cursor.paragraph(
                &clean_text(content),
                x,
                width,
                Font::Helvetica,
                self.config.body_size,
                BODY_COLOR,
            );
        }

        if entry.log_type == LogType::Photo {
            if let Some(url) = entry.file_url.as_deref() {
                self.embed_image(
                    cursor,
                    entry.id,
                    url,
                    self.config.image_width,
                    self.config.image_height,
                )
                .await;
            }
        } else {
            let photos: Vec<&IncidentLog> = associated_photos(entry, logs)
                .into_iter()
                .filter(|p| p.file_url.is_some())
                .collect();
            if !photos.is_empty() {
                cursor.ensure_room(line_height_mm(9.0));
                cursor.text_line("Attached Photos:", x, Font::HelveticaBold, 9.0, BODY_COLOR);
                for photo in photos {
                    if let Some(url) = photo.file_url.as_deref() {
                        self.embed_image(
                            cursor,
                            photo.id,
                            url,
                            self.config.attached_image_width,
                            self.config.attached_image_height,
                        )
                        .await;
                    }
                }
            }
        }
        cursor.advance(4.0);
    }

    /// AI consultation history: every chat log in original order.
    fn render_consultation(&self, cursor: &mut PageCursor, logs: &[IncidentLog]) {
        let chats: Vec<&IncidentLog> = logs
            .iter()
            .filter(|l| l.log_type == LogType::Chat)
            .collect();
        if chats.is_empty() {
            return;
        }

        section_heading(cursor, "AI Consultation History");
        let x = cursor.left();
        let width = cursor.content_width();
        for chat in chats {
            let (role, pill) = if chat.is_ai {
                ("AI ASSISTANT", AI_PILL)
            } else {
                ("YOU", USER_PILL)
            };
            let timestamp = format_timestamp(chat.created_at);
            draw_pill(cursor, role, pill, Some(&timestamp));
            cursor.advance(1.0);
            render_markdown(cursor, &chat.content, x, width);
            cursor.advance(3.0);
        }
    }

    async fn embed_image(
        &self,
        cursor: &mut PageCursor,
        log_id: LogId,
        url: &str,
        w: f64,
        h: f64,
    ) {
        match self.fetch_and_decode(url).await {
            Ok(image) => {
                cursor.ensure_room(h + 2.0);
                let x = cursor.left();
                let y = cursor.y();
                let pdf = cursor.pdf_mut();
                let id = pdf.add_image(image);
                pdf.draw_image(id, x, y, w, h);
                cursor.advance(h + 2.0);
            }
            Err(e) => {
                warn!(
                    log_id = %log_id,
                    asset_url = url,
                    error = %e,
                    "image embed failed, rendering placeholder"
                );
                cursor.ensure_room(line_height_mm(9.0));
                let x = cursor.left();
                cursor.text_line(IMAGE_PLACEHOLDER, x, Font::HelveticaOblique, 9.0, MUTED_COLOR);
            }
        }
    }

    async fn fetch_and_decode(&self, url: &str) -> Result<PdfImage> {
        let asset = self.fetcher.fetch(url).await?;
        PdfImage::decode(&asset.bytes)
    }
}

/// Photos rendered under a non-photo evidence entry.
///
/// The `parentLogId` back-reference is authoritative. Photos that carry a
/// matching `<type>_photo` category but no parent reference are picked up
/// by the legacy time-window rule: created within [`ASSOCIATION_WINDOW_SECS`]
/// after the entry. The two paths are deduplicated by log id.
fn associated_photos<'a>(entry: &IncidentLog, logs: &'a [IncidentLog]) -> Vec<&'a IncidentLog> {
    let mut seen: HashSet<LogId> = HashSet::new();
    let mut photos: Vec<&IncidentLog> = attached_photos(entry, logs);
    photos.retain(|p| seen.insert(p.id));

    if let Some(event_category) = LogCategory::event_photo(entry.log_type) {
        let window = Duration::seconds(ASSOCIATION_WINDOW_SECS);
        for photo in logs.iter().filter(|l| {
            l.log_type == LogType::Photo
                && l.parent_log_id().is_none()
                && l.category().as_ref() == Some(&event_category)
                && l.created_at >= entry.created_at
                && l.created_at < entry.created_at + window
        }) {
            if seen.insert(photo.id) {
                photos.push(photo);
            }
        }
    }
    photos
}

fn section_heading(cursor: &mut PageCursor, title: &str) {
    cursor.advance(3.0);
    cursor.ensure_room(line_height_mm(13.0) + 4.0);
    let x = cursor.left();
    cursor.text_line(title, x, Font::HelveticaBold, 13.0, TITLE_COLOR);
    cursor.advance(2.0);
}

/// Colored pill with white uppercase text, optionally followed by a
/// muted annotation on the same baseline.
fn draw_pill(cursor: &mut PageCursor, text: &str, background: Color, annotation: Option<&str>) {
    let size = 8.5;
    let pill_height = line_height_mm(size) + 1.0;
    let pill_width = text_width_mm(text, Font::HelveticaBold, size) + 4.0;
    cursor.ensure_room(pill_height);

    let x = cursor.left();
    let y = cursor.y();
    cursor.fill_rect(x, y, pill_width, pill_height, background);
    let baseline = y + 0.5 + line_height_mm(size) * 0.8;
    let pdf = cursor.pdf_mut();
    pdf.set_font(Font::HelveticaBold, size);
    pdf.set_text_color(WHITE);
    pdf.text(text, x + 2.0, baseline);
    if let Some(annotation) = annotation {
        pdf.set_font(Font::Helvetica, size);
        pdf.set_text_color(MUTED_COLOR);
        pdf.text(annotation, x + pill_width + 3.0, baseline);
    }
    cursor.advance(pill_height);
}

/// Stamp "Page X of N | Generated by <brand> | <date>" centered at the
/// bottom of every page. Runs after layout completes, when N is known.
fn stamp_footers(pdf: &mut Pdf, config: &ReportConfig, generated_at: DateTime<Utc>) {
    let total = pdf.page_count();
    let y = config.page_height - 10.0;
    pdf.set_font(Font::Helvetica, 8.0);
    pdf.set_text_color(MUTED_COLOR);
    for page in 0..total {
        pdf.set_page(page);
        let text = format!(
            "Page {} of {} | Generated by {} | {}",
            page + 1,
            total,
            config.brand,
            format_date(generated_at)
        );
        let x = (config.page_width - text_width_mm(&text, Font::Helvetica, 8.0)) / 2.0;
        pdf.text(&text, x, y);
    }
}

fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%b %d, %Y").to_string()
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%b %d, %Y %H:%M").to_string()
}

/// Render a report and deliver it through the sink, reporting the outcome
/// via one toast either way.
///
/// Analytics fires only after a successful save; a tracking failure is
/// logged and not surfaced, since the export has already completed. On
/// any render or save error nothing is delivered and the user sees one
/// generic failure toast.
pub async fn export_case_report<F: ImageFetcher>(
    exporter: &CaseReportExporter<F>,
    incident: &Incident,
    logs: &[IncidentLog],
    sink: &dyn ReportSink,
    notifier: &dyn Notifier,
    analytics: &dyn Analytics,
) -> Result<()> {
    let outcome = async {
        let bytes = exporter.render(incident, logs).await?;
        sink.save(&report_filename(incident), &bytes).await?;
        Ok::<_, Error>(())
    }
    .await;

    match outcome {
        Ok(()) => {
            notifier.notify(
                "Report exported",
                Some("Your case report PDF has been saved."),
                ToastVariant::Info,
            );
            if let Err(e) = analytics.track_pdf_export().await {
                warn!(error = %e, "pdf export tracking failed");
            }
            Ok(())
        }
        Err(e) => {
            error!(incident_id = %incident.id, error = %e, "case report export failed");
            notifier.notify(
                "Export failed",
                Some("The case report could not be generated. Please try again."),
                ToastVariant::Error,
            );
            Err(e)
        }
    }
}

fn report_filename(incident: &Incident) -> String {
    format!("incident-{}-report.pdf", incident.id)
}
