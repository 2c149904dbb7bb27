use nexthire_core::router;

pub fn run() {
    let width = router::table()
        .iter()
        .map(|entry| entry.pattern.len())
        .max()
        .unwrap_or(0);

    for entry in router::table() {
        println!(
            "{:<width$}  {:<7}  {}",
            entry.pattern,
            entry.policy.as_str(),
            entry.title
        );
    }
}
