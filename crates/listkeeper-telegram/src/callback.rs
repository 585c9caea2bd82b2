//! Inline-button callback payload codec
//!
//! Callback payloads are decoded once at the transport boundary into
//! this enum; the dispatcher switches on variants instead of scanning
//! string prefixes.

const SHOW_MENU: &str = "lists";
const CREATE: &str = "create";
const DELETE_MENU: &str = "delete_menu";
const SHOW_PREFIX: &str = "list:";
const DELETE_PREFIX: &str = "delete:";

/// Decoded inline-button payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    /// Show one button per existing list
    ShowListMenu,
    /// Show the values of the named list
    ShowList(String),
    /// Prompt for "name value" input (sets the save state)
    CreateList,
    /// Show one delete button per existing list
    DeleteListMenu,
    /// Delete the named list
    DeleteList(String),
}

impl CallbackAction {
    /// Wire payload carried by the inline button
    pub fn encode(&self) -> String {
        match self {
            CallbackAction::ShowListMenu => SHOW_MENU.to_string(),
            CallbackAction::ShowList(key) => format!("{SHOW_PREFIX}{key}"),
            CallbackAction::CreateList => CREATE.to_string(),
            CallbackAction::DeleteListMenu => DELETE_MENU.to_string(),
            CallbackAction::DeleteList(key) => format!("{DELETE_PREFIX}{key}"),
        }
    }

    /// Decode a wire payload; unknown payloads yield `None`
    pub fn parse(data: &str) -> Option<Self> {
        if let Some(key) = data.strip_prefix(SHOW_PREFIX) {
            return Some(CallbackAction::ShowList(key.to_string()));
        }
        if let Some(key) = data.strip_prefix(DELETE_PREFIX) {
            return Some(CallbackAction::DeleteList(key.to_string()));
        }
        match data {
            SHOW_MENU => Some(CallbackAction::ShowListMenu),
            CREATE => Some(CallbackAction::CreateList),
            DELETE_MENU => Some(CallbackAction::DeleteListMenu),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let actions = [
            CallbackAction::ShowListMenu,
            CallbackAction::ShowList("groceries".to_string()),
            CallbackAction::CreateList,
            CallbackAction::DeleteListMenu,
            CallbackAction::DeleteList("groceries".to_string()),
        ];
        for action in actions {
            assert_eq!(CallbackAction::parse(&action.encode()), Some(action));
        }
    }

    #[test]
    fn test_key_containing_separator() {
        let action = CallbackAction::ShowList("a:b c".to_string());
        assert_eq!(CallbackAction::parse(&action.encode()), Some(action));
    }

    #[test]
    fn test_unknown_payload() {
        assert_eq!(CallbackAction::parse("bogus"), None);
        assert_eq!(CallbackAction::parse(""), None);
    }
}
