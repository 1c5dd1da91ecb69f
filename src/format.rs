use crate::batch::{BatchResult, ParsedRecord};
use crate::store::{UpdateAction, UpdateReport};
use std::fmt::Write;

pub const NOT_FOUND_MESSAGE: &str = "❌ Не найдено ни одной записи в формате \"Город с ДД.ММ\"";

pub const NOTHING_UNDERSTOOD_MESSAGE: &str = "❌ Не найдено ни одной записи в правильном формате.\n\n\
     Используйте формат: \"Город с ДД.ММ\"\n\n\
     Пример: Москва с 9.02";

/// Render the records the way they are shown before committing them.
pub fn format_preview(records: &[ParsedRecord]) -> String {
    if records.is_empty() {
        return NOT_FOUND_MESSAGE.to_string();
    }

    let mut out = format!("✅ Найдено записей: {}\n\n", records.len());
    for (i, r) in records.iter().enumerate() {
        let _ = write!(out, "{}. {} - {}", i + 1, r.city, r.date);
        if let Some(restrictions) = &r.restrictions {
            let _ = write!(out, " (кроме {})", restrictions);
        }
        out.push('\n');
    }
    out
}

/// "N of M lines recognized" note, only when some lines were dropped.
pub fn format_recognition_warning(batch: &BatchResult) -> Option<String> {
    if batch.unrecognized.is_empty() {
        return None;
    }
    Some(format!(
        "⚠️ Распознано строк: {} из {}",
        batch.recognized_lines(),
        batch.total_lines
    ))
}

pub fn format_report(report: &UpdateReport, limit: usize) -> String {
    let mut out = String::from("✅ Обновление завершено!\n\n");
    let _ = writeln!(out, "📊 Всего обработано: {}", report.total);
    let _ = writeln!(out, "✅ Успешно: {}", report.success.len());

    if !report.failed.is_empty() {
        let _ = writeln!(out, "❌ Ошибок: {}\n", report.failed.len());
        out.push_str("Ошибки:\n");
        for f in &report.failed {
            let _ = writeln!(out, "• {}: {}", f.city, f.error);
        }
    }

    if !report.success.is_empty() {
        out.push_str("\nОбновленные города:\n");
        for s in report.success.iter().take(limit) {
            let action = match s.action {
                UpdateAction::Created => "создан",
                UpdateAction::Updated => "обновлен",
            };
            let _ = writeln!(out, "• {} - {} ({})", s.city, s.date, action);
        }
        if report.success.len() > limit {
            let _ = write!(out, "\n... и еще {} городов", report.success.len() - limit);
        }
    }
    out
}
