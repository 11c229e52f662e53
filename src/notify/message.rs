use crate::{
    domain::{ExitLevels, SignalEvent},
    utils::format_price,
};

/// Telegram HTML body announcing a signal.
pub fn signal_message(event: &SignalEvent, levels: &ExitLevels) -> String {
    format!(
        "🚨 <b>{} {}</b>\n\n<b>Entry:</b> ${}\n<b>Stop Loss:</b> ${}\n<b>Take Profit:</b> ${}",
        event.direction.to_string().to_uppercase(),
        event.symbol,
        format_price(event.entry_price),
        format_price(levels.stop_loss),
        format_price(levels.take_profit),
    )
}
