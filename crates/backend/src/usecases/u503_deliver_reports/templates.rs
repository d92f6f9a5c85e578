use contracts::usecases::u502_store_reports::{ExecutiveReportPayload, StoreReportPayload};

use super::{Attachment, EmailMessage};
use crate::shared::format::{format_date, format_money, format_number, format_ticket};

/// Minimal escaping for values interpolated into the HTML body
fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn store_report_message(payload: &StoreReportPayload, currency: &str) -> EmailMessage {
    let revenue = format_money(currency, payload.total_revenue);
    let quantity = format_number(payload.total_quantity);
    let ticket = format_ticket(currency, payload.average_ticket);

    let html = format!(
        r#"<p>Prezado(a) {manager},</p>
<p>Segue o relatório consolidado de desempenho da loja <strong>{store}</strong>.</p>
<ul>
    <li><strong>Faturamento Total:</strong> {revenue}</li>
    <li><strong>Quantidade de Vendas:</strong> {quantity}</li>
    <li><strong>Ticket Médio da Loja:</strong> {ticket}</li>
</ul>
<p>Qualquer dúvida, estou à disposição.</p>
<p>Att.,</p>
<p>Robô de Automação</p>
"#,
        manager = escape_html(&payload.recipient_name),
        store = escape_html(&payload.store_name),
    );

    let text = format!(
        "Prezado(a) {manager},\n\n\
         Segue o relatório consolidado de desempenho da loja {store}.\n\n\
         Faturamento Total: {revenue}\n\
         Quantidade de Vendas: {quantity}\n\
         Ticket Médio da Loja: {ticket}\n\n\
         Qualquer dúvida, estou à disposição.\n\n\
         Att.,\nRobô de Automação\n",
        manager = payload.recipient_name,
        store = payload.store_name,
    );

    EmailMessage {
        to: payload.recipient_email.clone(),
        to_name: payload.recipient_name.clone(),
        subject: payload.subject.clone(),
        body_html: Some(html),
        body_text: Some(text),
        attachments: Vec::new(),
    }
}

pub fn executive_report_message(
    payload: &ExecutiveReportPayload,
    currency: &str,
    attachments: Vec<Attachment>,
) -> EmailMessage {
    let text = format!(
        "Prezados, bom dia.\n\n\
         O resultado consolidado do ano até o momento é:\n\
         Melhor Loja em Faturamento: {best} com {best_revenue}\n\
         Pior Loja em Faturamento: {worst} com {worst_revenue}\n\n\
         No último dia ({date}) a melhor loja foi {day_best} com {day_best_revenue}.\n\n\
         Seguem em anexo os rankings detalhados do ano e do último dia ({date}).\n\n\
         Qualquer dúvida, estou à disposição.\n\n\
         Att.,\nRobô de Automação\n",
        best = payload.best_store,
        best_revenue = format_money(currency, payload.best_revenue),
        worst = payload.worst_store,
        worst_revenue = format_money(currency, payload.worst_revenue),
        date = format_date(payload.latest_date),
        day_best = payload.latest_day_best_store,
        day_best_revenue = format_money(currency, payload.latest_day_best_revenue),
    );

    EmailMessage {
        to: payload.recipient_email.clone(),
        to_name: payload.recipient_name.clone(),
        subject: payload.subject.clone(),
        body_html: None,
        body_text: Some(text),
        attachments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::dashboards::d400_store_kpi::AverageTicket;

    fn store_payload(ticket: AverageTicket) -> StoreReportPayload {
        StoreReportPayload {
            subject: "OnePage Anual - Loja Alpha & Co".into(),
            recipient_email: "ana@example.com".into(),
            recipient_name: "Ana".into(),
            store_name: "Alpha & Co".into(),
            total_revenue: 12345.6,
            total_quantity: 1500,
            average_ticket: ticket,
        }
    }

    #[test]
    fn test_store_report_formats_values() {
        let msg = store_report_message(&store_payload(AverageTicket::Value(8.2304)), "R$");

        let html = msg.body_html.unwrap();
        assert!(html.contains("Prezado(a) Ana"));
        assert!(html.contains("Alpha &amp; Co"));
        assert!(html.contains("R$12,345.60"));
        assert!(html.contains("1,500"));
        assert!(html.contains("R$8.23"));
        assert_eq!(msg.to, "ana@example.com");
        assert!(msg.body_text.unwrap().contains("Alpha & Co"));
    }

    #[test]
    fn test_store_report_with_undefined_ticket() {
        let msg = store_report_message(&store_payload(AverageTicket::Undefined), "R$");

        let text = msg.body_text.unwrap();
        assert!(text.contains("Ticket Médio da Loja: n/a"));
        assert!(!text.contains("NaN"));
        assert!(!text.contains("inf"));
    }

    #[test]
    fn test_executive_report_body() {
        let payload = ExecutiveReportPayload {
            subject: "Ranking Anual e do Dia 26/12/2019".into(),
            recipient_email: "board@example.com".into(),
            recipient_name: "Diretoria".into(),
            best_store: "Iguatemi Campinas".into(),
            best_revenue: 1762419.0,
            worst_store: "Norte Shopping".into(),
            worst_revenue: 1534553.0,
            latest_date: NaiveDate::from_ymd_opt(2019, 12, 26).unwrap(),
            latest_day_best_store: "Iguatemi Esplanada".into(),
            latest_day_best_revenue: 20000.5,
        };

        let msg = executive_report_message(&payload, "R$", Vec::new());
        let text = msg.body_text.unwrap();

        assert!(text.contains("Melhor Loja em Faturamento: Iguatemi Campinas com R$1,762,419.00"));
        assert!(text.contains("Pior Loja em Faturamento: Norte Shopping com R$1,534,553.00"));
        assert!(text.contains("(26/12/2019)"));
        assert!(msg.body_html.is_none());
    }
}
