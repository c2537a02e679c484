//! Tagged admin/user command type.
//!
//! The transport decodes its loosely-delimited callback token exactly once,
//! at the boundary, into this enum. Engines only ever see typed fields and
//! never parse delimited strings themselves.

use crate::{DisplayMode, MuteDuration};
use std::str::FromStr;

/// An inbound operation request, decoded at the transport boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Paged user listing
    ListUsers {
        /// Zero-based page index
        page: i64,
    },
    /// Paged referral listing
    ListReferrals {
        /// Zero-based page index
        page: i64,
    },
    /// Paged pending-message listing
    ListMessages {
        /// Zero-based page index
        page: i64,
    },
    /// Paged muted-user listing
    ListMuted {
        /// Zero-based page index
        page: i64,
    },
    /// Open the action menu for one user
    ModifyUser {
        /// Target account
        user_id: i64,
    },
    /// Delete a user account
    DeleteUser {
        /// Target account
        user_id: i64,
    },
    /// Show the points options for one user
    SetPointsMenu {
        /// Target account
        user_id: i64,
    },
    /// Apply a chosen points balance
    ConfirmPoints {
        /// Target account
        user_id: i64,
        /// New balance
        points: i64,
    },
    /// Reset a user to the starting balance and clear the wallet
    ResetUser {
        /// Target account
        user_id: i64,
    },
    /// Show one support message
    ViewMessage {
        /// Message identifier
        message_id: i32,
    },
    /// Begin replying to a support message
    ReplyMessage {
        /// Message identifier
        message_id: i32,
    },
    /// Dismiss a support message
    IgnoreMessage {
        /// Message identifier
        message_id: i32,
    },
    /// Mute a user for a duration
    MuteUser {
        /// Target account
        user_id: i64,
        /// Mute duration tag
        duration: MuteDuration,
    },
    /// Lift a mute
    UnmuteUser {
        /// Target account
        user_id: i64,
    },
    /// Open the admin management panel
    ManageAdmins,
    /// Begin adding a delegated admin
    AddAdmin,
    /// Remove a delegated admin
    RemoveAdmin {
        /// Target admin
        admin_id: i64,
    },
    /// Change the caller's user-list display preference
    SetDisplayMode {
        /// Chosen mode
        mode: DisplayMode,
    },
    /// Remove an advertisement and cancel its delivery task
    RemoveAd {
        /// Advertisement name
        name: String,
    },
    /// Confirm a pending withdrawal offer
    ConfirmWithdraw,
    /// Abandon a pending withdrawal offer
    CancelWithdraw,
    /// Return to the admin panel
    Back,
}

impl Command {
    /// Decode a legacy delimited callback token.
    ///
    /// Returns `None` for unknown prefixes or malformed arguments; the
    /// transport treats that as a stale affordance, not an error.
    pub fn decode(token: &str) -> Option<Self> {
        match token {
            "manage_admins_panel" => return Some(Command::ManageAdmins),
            "add_admin" => return Some(Command::AddAdmin),
            "confirm_withdraw" => return Some(Command::ConfirmWithdraw),
            "cancel_withdraw" => return Some(Command::CancelWithdraw),
            "admin_back" => return Some(Command::Back),
            _ => {}
        }

        if let Some(rest) = token.strip_prefix("admin_users_") {
            return Some(Command::ListUsers { page: rest.parse().ok()? });
        }
        if let Some(rest) = token.strip_prefix("admin_referrals_") {
            return Some(Command::ListReferrals { page: rest.parse().ok()? });
        }
        if let Some(rest) = token.strip_prefix("admin_messages_") {
            return Some(Command::ListMessages { page: rest.parse().ok()? });
        }
        if let Some(rest) = token.strip_prefix("view_muted_users_") {
            return Some(Command::ListMuted { page: rest.parse().ok()? });
        }
        if let Some(rest) = token.strip_prefix("modify_user_") {
            return Some(Command::ModifyUser { user_id: rest.parse().ok()? });
        }
        if let Some(rest) = token.strip_prefix("delete_user_") {
            return Some(Command::DeleteUser { user_id: rest.parse().ok()? });
        }
        if let Some(rest) = token.strip_prefix("confirm_points_") {
            let (user, points) = rest.split_once('_')?;
            return Some(Command::ConfirmPoints {
                user_id: user.parse().ok()?,
                points: points.parse().ok()?,
            });
        }
        if let Some(rest) = token.strip_prefix("set_points_") {
            return Some(Command::SetPointsMenu { user_id: rest.parse().ok()? });
        }
        if let Some(rest) = token.strip_prefix("reset_user_") {
            return Some(Command::ResetUser { user_id: rest.parse().ok()? });
        }
        if let Some(rest) = token.strip_prefix("view_message_") {
            return Some(Command::ViewMessage { message_id: rest.parse().ok()? });
        }
        if let Some(rest) = token.strip_prefix("reply_message_") {
            return Some(Command::ReplyMessage { message_id: rest.parse().ok()? });
        }
        if let Some(rest) = token.strip_prefix("ignore_message_") {
            return Some(Command::IgnoreMessage { message_id: rest.parse().ok()? });
        }
        if let Some(rest) = token.strip_prefix("mute_user_") {
            let (user, tag) = rest.split_once('_')?;
            return Some(Command::MuteUser {
                user_id: user.parse().ok()?,
                duration: MuteDuration::from_str(tag).ok()?,
            });
        }
        if let Some(rest) = token.strip_prefix("unmute_user_") {
            return Some(Command::UnmuteUser { user_id: rest.parse().ok()? });
        }
        if let Some(rest) = token.strip_prefix("remove_admin_") {
            return Some(Command::RemoveAdmin { admin_id: rest.parse().ok()? });
        }
        if let Some(rest) = token.strip_prefix("display_mode_") {
            return Some(Command::SetDisplayMode {
                mode: DisplayMode::from_str(rest).ok()?,
            });
        }
        if let Some(rest) = token.strip_prefix("remove_ad_") {
            return Some(Command::RemoveAd { name: rest.to_string() });
        }

        None
    }
}
