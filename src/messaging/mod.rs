// Messaging module - lock-free channels and user-facing notifications

pub mod channels;
pub mod notification;

pub use channels::{
    create_notification_channel, create_step_channel, create_trigger_channel, NotificationConsumer,
    NotificationProducer, StepEventConsumer, StepEventProducer, TriggerConsumer, TriggerProducer,
};
pub use notification::{Notification, NotificationCategory, NotificationLevel};
