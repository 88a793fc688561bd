// Messaging module - Lock-free communication between the ticker thread,
// the storage layer, and the front end

pub mod channels;
pub mod event;
pub mod notification;

pub use channels::{
    create_beat_channel, create_notification_channel, BeatEventConsumer, BeatEventProducer,
    NotificationConsumer, NotificationProducer,
};
pub use event::BeatEvent;
pub use notification::{Notification, NotificationCategory, NotificationLevel};
