use console::Style;
use spritemend_core::pipeline::Report;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    good: Style,
    bad: Style,
    warn: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            good: Style::new().green(),
            bad: Style::new().red(),
            warn: Style::new().yellow(),
        }
    }
}

pub fn print_report_summary(report: &Report) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("SpriteMend Report"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(17)));
    println!();

    println!(
        "  {:<16}{}",
        s.label.apply_to("Total frames"),
        s.value.apply_to(report.total_frames)
    );
    println!(
        "  {:<16}{}",
        s.label.apply_to("Bad frames"),
        if report.bad_frames.is_empty() {
            s.good.apply_to("none".to_string())
        } else {
            s.bad.apply_to(report.bad_frames.len().to_string())
        }
    );
    println!(
        "  {:<16}{}",
        s.label.apply_to("Replaced"),
        s.value.apply_to(report.replacements.len())
    );
    let unresolved = report.unresolved_count();
    if unresolved > 0 {
        println!(
            "  {:<16}{}",
            s.label.apply_to("Unresolved"),
            s.warn.apply_to(unresolved)
        );
    }
    println!();

    if !report.bad_frames.is_empty() {
        println!("  {}", s.header.apply_to("Bad Frames"));
        for record in &report.bad_frames {
            let reasons: Vec<&str> = record.reasons.iter().map(|a| a.kind.label()).collect();
            let replacement = match record.replacement {
                Some(source) => format!("-> frame {source}"),
                None => "unresolved".to_string(),
            };
            println!(
                "    {:>5}  {:<9}  {:<24}  {}",
                s.value.apply_to(record.index),
                format!("{:?}", record.severity).to_lowercase(),
                reasons.join(", "),
                s.label.apply_to(replacement)
            );
        }
        println!();
    }

    println!("  {}", s.header.apply_to("Verification"));
    if report.verified {
        println!("    {}", s.good.apply_to("passed"));
    } else {
        println!("    {}", s.bad.apply_to("issues found"));
        for issue in &report.verification_details.issues {
            println!("    - {}", s.warn.apply_to(issue));
        }
    }
    println!();
}
