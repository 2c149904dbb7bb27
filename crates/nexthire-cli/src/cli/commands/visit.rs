use anyhow::Result;
use nexthire_core::access::GuardView;
use nexthire_core::api::ApiClient;
use nexthire_core::config::Config;
use nexthire_core::credentials::CredentialHolder;
use nexthire_core::nav;
use nexthire_core::navigator::{Navigator, Screen};
use nexthire_core::session::SessionContext;

pub async fn run(config: &Config, path: &str) -> Result<()> {
    let mut navigator = navigator(config)?;
    let screen = navigator.visit(path).await?;
    print_screen(&screen);
    Ok(())
}

pub fn navigator(config: &Config) -> Result<Navigator> {
    let api = ApiClient::from_config(config)?;
    let credentials = CredentialHolder::from_config(config);
    Ok(Navigator::new(SessionContext::new(credentials), api))
}

pub fn print_screen(screen: &Screen) {
    for to in &screen.redirects {
        println!("Redirect: {to}");
    }
    println!("Location: {}", screen.location);
    println!("Page: {}", screen.route.title());

    let view = match screen.view {
        None => "unguarded",
        Some(GuardView::Nothing) => "nothing",
        Some(GuardView::Waiting) => "waiting",
        Some(GuardView::Page { navigation: false }) => "page",
        Some(GuardView::Page { navigation: true }) => "page with navigation",
    };
    println!("View: {view}");

    if let Some((items, active)) = &screen.menu {
        println!("Menu:");
        for (i, item) in items.iter().enumerate() {
            let marker = if Some(i) == *active { '*' } else { ' ' };
            println!("  {marker} {:<14} {}", item.label, item.path);
        }
        println!("    {}", nav::LOGOUT_LABEL);
    }

    if let Some(identity) = &screen.identity {
        println!(
            "Identity: {} <{}> ({})",
            identity.name,
            identity.email,
            identity.role.label()
        );
    }
}
