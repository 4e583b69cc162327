use storefront_core::AppConfig;

pub(crate) fn run_redirect(url: &str, supplied: Option<&str>) -> anyhow::Result<()> {
    let target = storefront_core::add_to_cart_redirect(supplied, url)?;
    println!("{target}");
    Ok(())
}

pub(crate) fn run_footer(config: &AppConfig, year: Option<i32>) -> anyhow::Result<()> {
    let file = storefront_core::load_checkout(&config.checkout_path)?;
    let hooks = file.hooks(&config.site_title);

    let text = match year {
        Some(year) => hooks.email_footer_text(year),
        None => hooks.current_email_footer_text(),
    };
    match text {
        Some(text) => println!("{text}"),
        None => tracing::info!("no email footer configured; platform default applies"),
    }
    if !hooks.structured_data_enabled() {
        println!("product structured data: suppressed");
    }
    Ok(())
}
