//! The palette flow end to end: register, open, type, scroll, execute.

use cmdindex::{Command, CommandIndex};

fn main() {
    let mut index: CommandIndex<&'static str> = CommandIndex::new();

    index.register(Command::new("Save", "file.save").with_shortcut("Ctrl+S"));
    index.register(Command::new("Save As", "file.save_as").with_shortcut("Ctrl+Shift+S"));
    index.register(Command::new("Search Everywhere", "nav.search").with_shortcut("Ctrl+P"));
    let select_all = index.register(Command::new("Select All", "edit.select_all"));
    index.register(Command::new("Settings", "app.settings"));
    index.register(Command::new("Close Tab", "tab.close").with_shortcut("Ctrl+W"));

    // Opening the palette lists commands in tree order.
    println!("=== Palette opened ===");
    for (_, cmd) in &index.open_palette().items {
        println!("  {} {:?}", cmd.name, cmd.shortcut);
    }

    // The user types "sav": strict prefix matches first.
    let page = index.strict_search("sav", 8);
    println!("\n=== strict \"sav\" ===");
    for (_, cmd) in &page.items {
        println!("  {}", cmd.name);
    }

    // They keep typing; the cursor resumes from its last hit instead of
    // rescanning from the root.
    let page = index.continue_strict_search(page.cursor, "save a");
    println!("\n=== continued \"save a\" ===");
    for (_, cmd) in &page.items {
        println!("  {}", cmd.name);
    }

    // Substring fallback catches mid-name matches.
    let page = index.soft_search("tab", 8);
    println!("\n=== soft \"tab\" ===");
    for (_, cmd) in &page.items {
        println!("  {}", cmd.name);
    }

    // Executing a command promotes it; the next listing leads with it.
    index.promote(select_all);
    let page = index.list_all(1);
    println!(
        "\nAfter executing Select All, the palette leads with: {}",
        page.items[0].1.name
    );

    println!("\n{:?}", index.stats());
}
