mod dispatcher;
mod message;
mod transport;

pub use {
    dispatcher::{ChannelOutcome, DispatchReport, NotificationDispatcher},
    message::signal_message,
    transport::{MessageTransport, TelegramTransport},
};
