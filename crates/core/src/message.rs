//! Outbound message composition for ticket dispatch.
//!
//! Builds the WhatsApp notification text for a ticket: a category label,
//! the ticket summary, an optional fixed-width materials table, and a tail
//! that differs for known platform users (in-app call to action) versus
//! unknown targets (invitation to join). The final deep link is packed
//! into a `wa.me` / `api.whatsapp.com` URL with the body encoded exactly
//! once by the query serializer.

use chrono::NaiveDate;
use url::Url;

use crate::error::CoreError;
use crate::identity::{ResolvedTarget, TargetKind};
use crate::types::DbId;

/// Label shown when the request does not fit a more specific wording.
pub const LABEL_GENERIC: &str = "Presupuesto";

/// Constructor asking for labor only.
pub const LABEL_LABOR: &str = "Presupuesto de mano de obra";

/// Constructor asking for labor plus materials.
pub const LABEL_COMBINED: &str = "Presupuesto de mano de obra + materiales";

/// Supplier-originated request (always materials).
pub const LABEL_MATERIALS: &str = "Presupuesto de materiales";

/// URLs the composer needs to build deep links and tails.
#[derive(Debug, Clone)]
pub struct ComposerConfig {
    /// Base URL of the product, e.g. `https://app.obralink.com`.
    pub app_base_url: String,
    /// Public landing page offered to targets without an account.
    pub landing_url: String,
}

/// The ticket fields that feed the message body.
#[derive(Debug, Clone)]
pub struct TicketSummary<'a> {
    pub ticket_id: DbId,
    pub creator_role: &'a str,
    pub category: &'a str,
    pub project_name: Option<&'a str>,
    pub title: &'a str,
    pub description: &'a str,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
}

/// One materials line item rendered into the fixed-width table.
#[derive(Debug, Clone)]
pub struct MaterialLine<'a> {
    pub material: &'a str,
    pub quantity: f64,
    pub unit: &'a str,
}

/// A composed outbound message: plain body text plus the channel URL that
/// opens the chat application pre-filled with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMessage {
    pub text: String,
    pub outbound_url: String,
}

/// Category label for the message header.
///
/// Wording depends on who originated the ticket and what it asks for;
/// anything outside the three specific combinations falls back to the
/// generic label.
pub fn category_label(creator_role: &str, category: &str) -> &'static str {
    match (creator_role, category) {
        ("supplier", _) => LABEL_MATERIALS,
        ("constructor", "labor") => LABEL_LABOR,
        ("constructor", "combined") => LABEL_COMBINED,
        _ => LABEL_GENERIC,
    }
}

/// Replace typographic characters that break fixed-width rendering in the
/// chat channel with ASCII-safe equivalents.
pub fn sanitize_channel_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '…' => out.push_str("..."),
            'µ' => out.push('u'),
            '²' => out.push('2'),
            '³' => out.push('3'),
            '\u{00a0}' => out.push(' '),
            '\t' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}

/// Compose the full outbound message for the primary dispatch target.
pub fn compose(
    ticket: &TicketSummary<'_>,
    materials: &[MaterialLine<'_>],
    target: &ResolvedTarget,
    config: &ComposerConfig,
) -> Result<ComposedMessage, CoreError> {
    let mut body = compose_body(ticket, materials);
    body.push_str(&compose_tail(ticket.ticket_id, target, config));

    let address = match target.kind {
        TargetKind::Phone => Some(target.normalized.as_str()),
        TargetKind::Email => None,
    };
    let outbound_url = build_channel_link(address, &body)?;

    Ok(ComposedMessage {
        text: body,
        outbound_url,
    })
}

/// Build the body text: label, optional project line, title, detail,
/// optional date line, optional materials table.
pub fn compose_body(ticket: &TicketSummary<'_>, materials: &[MaterialLine<'_>]) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(category_label(ticket.creator_role, ticket.category).to_string());

    if let Some(project) = ticket.project_name {
        if !project.trim().is_empty() {
            lines.push(format!("Obra: {project}"));
        }
    }

    lines.push(format!("Título: {}", ticket.title));
    lines.push(format!("Detalle: {}", ticket.description));

    if let Some(dates) = date_line(ticket) {
        lines.push(dates);
    }

    let mut body = sanitize_channel_text(&lines.join("\n"));

    if !materials.is_empty() {
        body.push_str("\n\nMateriales:\n");
        body.push_str(&materials_table(materials));
    }

    body
}

/// Join the configured dates into a single " · "-separated line, or `None`
/// when the ticket has no dates.
fn date_line(ticket: &TicketSummary<'_>) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(d) = ticket.start_date {
        parts.push(format!("Inicio: {}", d.format("%d/%m/%Y")));
    }
    if let Some(d) = ticket.end_date {
        parts.push(format!("Fin: {}", d.format("%d/%m/%Y")));
    }
    if let Some(d) = ticket.due_date {
        parts.push(format!("Entrega: {}", d.format("%d/%m/%Y")));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" · "))
    }
}

/// Render material line items as a fixed-width table.
///
/// Material names are padded to the widest entry so quantities line up in
/// monospace rendering; every cell goes through [`sanitize_channel_text`].
pub fn materials_table(items: &[MaterialLine<'_>]) -> String {
    let names: Vec<String> = items
        .iter()
        .map(|i| sanitize_channel_text(i.material))
        .collect();
    let width = names.iter().map(|n| n.chars().count()).max().unwrap_or(0);

    items
        .iter()
        .zip(names.iter())
        .map(|(item, name)| {
            let unit = sanitize_channel_text(item.unit);
            let quantity = format_quantity(item.quantity);
            format!("- {name:<width$}  {quantity} {unit}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Trim trailing zeros from a quantity: `50` not `50.0`, but `2.5` stays.
fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{quantity:.0}")
    } else {
        format!("{quantity}")
    }
}

/// Build the action or invitation tail for the primary target.
fn compose_tail(ticket_id: DbId, target: &ResolvedTarget, config: &ComposerConfig) -> String {
    let deep_link = ticket_link(ticket_id, config);
    if target.is_platform_user() {
        format!("\n\nIngresá a Obralink para aceptar o rechazar el pedido:\n{deep_link}")
    } else {
        format!(
            "\n\n¿Todavía no usás Obralink? Conocé la plataforma en {} y respondé el pedido acá:\n{deep_link}",
            config.landing_url
        )
    }
}

/// Deep link into the product for a given ticket.
pub fn ticket_link(ticket_id: DbId, config: &ComposerConfig) -> String {
    format!("{}/tickets/{ticket_id}", config.app_base_url.trim_end_matches('/'))
}

/// Build the WhatsApp URL that opens a chat pre-filled with `body`.
///
/// With a phone address the link targets that number (`wa.me` drops the
/// `+`); without one it opens the compose screen with the text attached.
/// The body is encoded exactly once by the URL query serializer.
pub fn build_channel_link(address: Option<&str>, body: &str) -> Result<String, CoreError> {
    let base = match address {
        Some(phone) => format!("https://wa.me/{}", phone.trim_start_matches('+')),
        None => "https://api.whatsapp.com/send".to_string(),
    };

    let mut url = Url::parse(&base)
        .map_err(|e| CoreError::Internal(format!("Invalid channel URL '{base}': {e}")))?;
    url.query_pairs_mut().append_pair("text", body);

    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::TargetKind;

    fn config() -> ComposerConfig {
        ComposerConfig {
            app_base_url: "https://app.obralink.com".to_string(),
            landing_url: "https://obralink.com".to_string(),
        }
    }

    fn summary<'a>() -> TicketSummary<'a> {
        TicketSummary {
            ticket_id: 42,
            creator_role: "constructor",
            category: "labor",
            project_name: Some("Torre Norte"),
            title: "Cerámicos",
            description: "50m2 de colocación",
            start_date: None,
            end_date: None,
            due_date: None,
        }
    }

    fn unknown_phone() -> ResolvedTarget {
        ResolvedTarget {
            kind: TargetKind::Phone,
            normalized: "+5491112345678".to_string(),
            matched_user_id: None,
            matched_contact_id: None,
        }
    }

    fn known_user_email() -> ResolvedTarget {
        ResolvedTarget {
            kind: TargetKind::Email,
            normalized: "a@b.com".to_string(),
            matched_user_id: Some(7),
            matched_contact_id: None,
        }
    }

    #[test]
    fn label_depends_on_role_and_category() {
        assert_eq!(category_label("constructor", "labor"), LABEL_LABOR);
        assert_eq!(category_label("constructor", "combined"), LABEL_COMBINED);
        assert_eq!(category_label("supplier", "materials"), LABEL_MATERIALS);
        assert_eq!(category_label("supplier", "labor"), LABEL_MATERIALS);
        assert_eq!(category_label("constructor", "materials"), LABEL_GENERIC);
    }

    #[test]
    fn body_includes_project_line_when_present() {
        let body = compose_body(&summary(), &[]);
        assert!(body.starts_with(LABEL_LABOR));
        assert!(body.contains("Obra: Torre Norte"));
        assert!(body.contains("Título: Cerámicos"));
        assert!(body.contains("Detalle: 50m2 de colocación"));
    }

    #[test]
    fn body_omits_project_line_when_absent() {
        let mut ticket = summary();
        ticket.project_name = None;
        let body = compose_body(&ticket, &[]);
        assert!(!body.contains("Obra:"));
    }

    #[test]
    fn dates_joined_with_middle_dot() {
        let mut ticket = summary();
        ticket.start_date = NaiveDate::from_ymd_opt(2026, 9, 1);
        ticket.due_date = NaiveDate::from_ymd_opt(2026, 9, 15);
        let body = compose_body(&ticket, &[]);
        assert!(body.contains("Inicio: 01/09/2026 · Entrega: 15/09/2026"));
    }

    #[test]
    fn no_date_line_without_dates() {
        let body = compose_body(&summary(), &[]);
        assert!(!body.contains("Inicio:"));
        assert!(!body.contains("Entrega:"));
    }

    #[test]
    fn materials_table_pads_and_sanitizes() {
        let items = vec![
            MaterialLine {
                material: "Cemento",
                quantity: 50.0,
                unit: "bolsa",
            },
            MaterialLine {
                material: "Arena fina…",
                quantity: 2.5,
                unit: "m³",
            },
        ];
        let table = materials_table(&items);
        assert!(table.contains("- Arena fina...  2.5 m3"));
        // Both names padded to the same width.
        assert!(table.contains("- Cemento        50 bolsa"));
    }

    #[test]
    fn unknown_target_gets_invitation_tail() {
        let message = compose(&summary(), &[], &unknown_phone(), &config()).unwrap();
        assert!(message.text.contains("Todavía no usás Obralink"));
        assert!(message.text.contains("https://app.obralink.com/tickets/42"));
    }

    #[test]
    fn known_user_gets_action_tail() {
        let message = compose(&summary(), &[], &known_user_email(), &config()).unwrap();
        assert!(message.text.contains("aceptar o rechazar"));
        assert!(!message.text.contains("Todavía no usás"));
    }

    #[test]
    fn phone_target_builds_wa_me_link() {
        let message = compose(&summary(), &[], &unknown_phone(), &config()).unwrap();
        assert!(message.outbound_url.starts_with("https://wa.me/5491112345678?text="));
    }

    #[test]
    fn email_target_builds_open_compose_link() {
        let message = compose(&summary(), &[], &known_user_email(), &config()).unwrap();
        assert!(message
            .outbound_url
            .starts_with("https://api.whatsapp.com/send?text="));
    }

    #[test]
    fn body_is_encoded_exactly_once() {
        let link = build_channel_link(None, "50% de avance").unwrap();
        // '%' encodes to %25 once; double encoding would yield %2525.
        assert!(link.contains("50%25+de+avance"));
        assert!(!link.contains("%2525"));
    }

    #[test]
    fn sanitize_replaces_typographic_characters() {
        assert_eq!(sanitize_channel_text("50 m² de PVC…"), "50 m2 de PVC...");
        assert_eq!(sanitize_channel_text("5 µm"), "5 um");
    }
}
