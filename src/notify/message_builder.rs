//! Builds the user-facing message texts.

use crate::alert::ActiveAlert;

/// Alerts listed at most this many per status message.
const STATUS_ALERT_LIMIT: usize = 10;

pub fn alert_message(location: &str) -> String {
    format!("🚨 <b>ТРИВОГА!</b>\n\n{location}\n\n⚠️ Прямуйте до укриття!")
}

pub fn broadcast_message(text: &str) -> String {
    format!("📢 <b>Оголошення:</b>\n\n{text}")
}

pub fn status_unavailable() -> String {
    "⚠️ Не вдалося отримати дані про тривоги. Перевірте API токен.".to_string()
}

/// On-demand status text for the given relevant alerts.
///
/// An empty alert list renders an explicit all-clear line, never silence;
/// the wording depends on whether the subscriber has chosen regions.
pub fn status_message(alerts: &[&ActiveAlert], regions: &[String]) -> String {
    if alerts.is_empty() {
        if regions.is_empty() {
            return "🟢 <b>Наразі тривог немає по всій Україні</b>".to_string();
        }
        return format!(
            "🟢 <b>Наразі тривог немає</b> у ваших регіонах:\n{}",
            regions.join(", ")
        );
    }

    let mut text = "🔴 <b>УВАГА! Повітряна тривога:</b>\n\n".to_string();
    for alert in alerts.iter().take(STATUS_ALERT_LIMIT) {
        text.push_str(&format!("🚨 {}\n", alert.location_title));
        if let Some(started_at) = alert.started_at {
            text.push_str(&format!("   ⏰ Початок: {started_at}\n"));
        }
    }
    text.push_str(&format!("\n📊 Всього активних тривог: {}", alerts.len()));
    text.push_str("\n\n⚠️ <b>Прямуйте до укриття!</b>");
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(location: &str) -> ActiveAlert {
        ActiveAlert {
            location_title: location.to_string(),
            location_uid: None,
            started_at: None,
        }
    }

    #[test]
    fn test_status_message_explicit_all_clear() {
        let none: Vec<&ActiveAlert> = Vec::new();
        assert!(status_message(&none, &[]).contains("по всій Україні"));

        let regions = vec!["Сумська область".to_string()];
        let text = status_message(&none, &regions);
        assert!(text.contains("тривог немає"));
        assert!(text.contains("Сумська область"));
    }

    #[test]
    fn test_status_message_lists_alerts_and_count() {
        let a1 = alert("Сумська область");
        let a2 = alert("м. Київ");
        let text = status_message(&[&a1, &a2], &[]);
        assert!(text.contains("Сумська область"));
        assert!(text.contains("м. Київ"));
        assert!(text.contains("Всього активних тривог: 2"));
    }

    #[test]
    fn test_status_message_caps_listing_but_not_count() {
        let alerts: Vec<ActiveAlert> = (0..15).map(|i| alert(&format!("Область {i}"))).collect();
        let refs: Vec<&ActiveAlert> = alerts.iter().collect();
        let text = status_message(&refs, &[]);
        assert!(text.contains("Область 9"));
        assert!(!text.contains("Область 10\n"));
        assert!(text.contains("Всього активних тривог: 15"));
    }
}
