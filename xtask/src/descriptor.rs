use anyhow::Result;
use colored::Colorize;
use platform::hid::REPORT_DESCRIPTOR;

/// Main item tags get their own line in the dump.
fn is_main_item(prefix: u8) -> bool {
    matches!(prefix & 0xFC, 0x80 | 0x90 | 0xB0 | 0xA0 | 0xC0)
}

/// Split the descriptor into short items: prefix byte plus 0, 1, 2 or 4 data bytes.
fn items(desc: &[u8]) -> Vec<&[u8]> {
    let mut out = Vec::new();
    let mut rest = desc;
    while let Some(&prefix) = rest.first() {
        let len = match prefix & 0x03 {
            3 => 5,
            n => usize::from(n).saturating_add(1),
        };
        let (item, tail) = rest.split_at(len.min(rest.len()));
        out.push(item);
        rest = tail;
    }
    out
}

pub fn run(c_array: bool) -> Result<()> {
    if c_array {
        let body: Vec<String> = REPORT_DESCRIPTOR.iter().map(|b| format!("0x{b:02X}")).collect();
        println!("{{ {} }}", body.join(", "));
        return Ok(());
    }

    println!();
    println!(
        "{}",
        format!("HID report descriptor ({} bytes)", REPORT_DESCRIPTOR.len())
            .cyan()
            .bold()
    );
    for item in items(REPORT_DESCRIPTOR) {
        let hex: Vec<String> = item.iter().map(|b| format!("{b:02X}")).collect();
        let line = format!("  {}", hex.join(" "));
        match item.first() {
            Some(&p) if is_main_item(p) => println!("{}", line.bold()),
            _ => println!("{line}"),
        }
    }
    println!();
    Ok(())
}
