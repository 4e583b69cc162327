use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["storefront-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
    assert!(cli.checkout.is_none());
}

#[test]
fn parses_validate_with_global_checkout_path() {
    let cli = Cli::try_parse_from(["storefront-cli", "validate", "--checkout", "/tmp/c.yaml"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Validate)));
    assert_eq!(cli.checkout, Some(PathBuf::from("/tmp/c.yaml")));
}

#[test]
fn parses_schema_products_with_and_without_quantity() {
    let cli = Cli::try_parse_from([
        "storefront-cli",
        "schema",
        "--product",
        "1758",
        "--product",
        "12:3",
    ])
    .unwrap();
    match cli.command {
        Some(Commands::Schema { products }) => {
            assert_eq!(products, vec![LineItem::new(1758, 1), LineItem::new(12, 3)]);
        }
        other => panic!("expected schema command, got {other:?}"),
    }
}

#[test]
fn rejects_non_numeric_product() {
    let result = Cli::try_parse_from(["storefront-cli", "schema", "--product", "hosting"]);
    assert!(result.is_err());
}

#[test]
fn parses_submit_fields_and_dry_run() {
    let cli = Cli::try_parse_from([
        "storefront-cli",
        "submit",
        "--order-id",
        "4021",
        "--product",
        "1758",
        "--field",
        "web_address=  mysite.com ",
        "--field",
        "host_pass=",
        "--dry-run",
    ])
    .unwrap();
    match cli.command {
        Some(Commands::Submit {
            order_id,
            products,
            fields,
            dry_run,
        }) => {
            assert_eq!(order_id, 4021);
            assert_eq!(products.len(), 1);
            assert_eq!(
                fields,
                vec![
                    ("web_address".to_string(), "  mysite.com ".to_string()),
                    ("host_pass".to_string(), String::new()),
                ]
            );
            assert!(dry_run);
        }
        other => panic!("expected submit command, got {other:?}"),
    }
}

#[test]
fn parse_field_requires_separator_and_key() {
    assert!(parse_field("web_address").is_err());
    assert!(parse_field("=value").is_err());
    assert_eq!(
        parse_field("note=a=b").unwrap(),
        ("note".to_string(), "a=b".to_string())
    );
}

#[test]
fn parse_line_item_rejects_bad_quantity() {
    assert!(parse_line_item("1758:many").is_err());
    assert_eq!(parse_line_item(" 7 : 2 ").unwrap(), LineItem::new(7, 2));
}

#[test]
fn parses_redirect_with_supplied_url() {
    let cli = Cli::try_parse_from([
        "storefront-cli",
        "redirect",
        "--url",
        "https://shop.example.com/?add-to-cart=1",
        "--supplied",
        "https://shop.example.com/cart/",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Redirect { supplied: Some(_), .. })
    ));
}

#[test]
fn redirect_runs_without_app_config() {
    // no AppConfig is loaded on this path, so a broken environment cannot fail it
    assert!(hooks::run_redirect("https://shop.example.com/?s=a%20b&add-to-cart=1", None).is_ok());
    assert!(hooks::run_redirect("/relative/?add-to-cart=1", None).is_err());
}

#[test]
fn parses_db_migrate_command() {
    let cli = Cli::try_parse_from(["storefront-cli", "db", "migrate"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}
