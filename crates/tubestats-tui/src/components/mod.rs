pub mod add_channel;
pub mod channel_detail;
pub mod channel_list;
pub mod header;
pub mod help_overlay;
