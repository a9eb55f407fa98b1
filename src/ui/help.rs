/// Key bindings shown by `/help` and in the sidebar footer.
pub const KEY_BINDINGS: &[(&str, &str)] = &[
    ("Enter", "Send the message"),
    ("Alt+Enter", "Insert a newline"),
    ("F2", "Cycle model"),
    ("F3 / F4", "Lower / raise temperature"),
    ("F5 / F6", "Lower / raise max tokens"),
    ("F7", "Cycle persona (clears history)"),
    ("F8", "Reset conversation"),
    ("Ctrl+S", "Export to chat_history.md"),
    ("PageUp / PageDown", "Scroll the transcript"),
    ("Ctrl+C", "Quit"),
];
