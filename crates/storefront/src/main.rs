//! Bazaar Storefront - interactive storefront client.
//!
//! Drives the storefront views (catalog browsing, cart, credential auth)
//! against the remote API from a line-based terminal session.
//!
//! # Architecture
//!
//! - Remote REST API for categories, products, and auth
//! - In-memory reactive stores for cart, search query, and toasts
//! - JSON-file session store for the logged-in user's fields
//!
//! Navigation mirrors the in-app views: `home`, `categories`, `signup`,
//! `login`, `cart`, `profile`.

#![cfg_attr(not(test), forbid(unsafe_code))]
// The terminal IS the UI surface of this binary
#![allow(clippy::print_stdout)]

use secrecy::SecretString;
use tokio::io::{AsyncBufReadExt, BufReader};

use bazaar_storefront::api::types::{Product, RegisterRequest, Role, Star, star_breakdown};
use bazaar_storefront::app::{AppShell, View};
use bazaar_storefront::config::StorefrontConfig;
use bazaar_storefront::state::AppState;
use bazaar_storefront::views::PageRequest;

#[tokio::main]
async fn main() {
    // Load configuration from environment (also reads .env)
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bazaar_storefront=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(api = %config.api_base_url, "Starting storefront shell");

    let state = AppState::new(config).expect("Failed to initialize application state");
    let mut app = AppShell::new(state);

    // Land on the home view, like a fresh page load
    app.navigate(View::Home).await;
    render(&app);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_prompt(&app);

    while let Ok(Some(line)) = lines.next_line().await {
        let input = line.trim();
        if input.is_empty() {
            print_prompt(&app);
            continue;
        }
        if input == "quit" || input == "exit" {
            break;
        }

        dispatch(&mut app, input).await;
        render(&app);
        print_prompt(&app);
    }

    tracing::info!("Shell exiting");
}

fn print_prompt(app: &AppShell) {
    println!();
    print_toasts(app);
    println!(
        "[{} | cart: {} items | {}] >",
        app.current_view(),
        app.state().cart().total_count(),
        if app.is_logged_in() {
            "logged in"
        } else {
            "logged out"
        }
    );
}

/// Parse one command line and apply it to the shell.
async fn dispatch(app: &mut AppShell, input: &str) {
    let mut parts = input.split_whitespace();
    let Some(command) = parts.next() else {
        return;
    };
    let args: Vec<&str> = parts.collect();

    match command {
        "help" => print_help(),

        // Navigation
        "go" => match args.first().and_then(|name| View::parse(name)) {
            Some(view) => app.navigate(view).await,
            None => println!("Unknown view. Views: home categories signup login cart profile"),
        },

        // Pagination (applies to the view currently shown)
        "next" => change_page(app, PageRequest::Next).await,
        "prev" => change_page(app, PageRequest::Prev).await,
        "page" => match args.first().and_then(|raw| raw.parse::<u32>().ok()) {
            Some(number) => change_page(app, PageRequest::Page(number)).await,
            None => println!("Usage: page <number>"),
        },

        // Category browsing
        "open" => match args.first().and_then(|raw| raw.parse::<usize>().ok()) {
            Some(number) => {
                let category = app
                    .categories
                    .categories()
                    .get(number.saturating_sub(1))
                    .cloned();
                match category {
                    Some(category) => app.categories.select_category(category).await,
                    None => println!("No category #{number}"),
                }
            }
            None => println!("Usage: open <category number>"),
        },
        "back" => app.categories.back_to_categories(),

        // Search
        "search" => app.state().search().set_query(&args.join(" ")),
        "clear-search" => app.state().search().clear(),

        // Cart
        "add" => match parse_index_and_quantity(&args) {
            Some((index, quantity)) => match displayed_product(app, index) {
                Some(product) => {
                    let name = product.name.clone();
                    app.state().cart().add_product(product, quantity);
                    println!("Added to cart: {name}");
                }
                None => println!("No product #{index} on this page"),
            },
            None => println!("Usage: add <product number> [quantity]"),
        },
        "remove" => match args.first().and_then(|raw| raw.parse::<usize>().ok()) {
            Some(index) => {
                let id = app
                    .state()
                    .cart()
                    .items()
                    .get(index.saturating_sub(1))
                    .map(|item| item.product.id.clone());
                match id {
                    Some(id) => app.state().cart().remove_product(&id),
                    None => println!("No cart entry #{index}"),
                }
            }
            None => println!("Usage: remove <cart entry number>"),
        },
        "qty" => match parse_index_and_quantity(&args) {
            Some((index, quantity)) => {
                let id = app
                    .state()
                    .cart()
                    .items()
                    .get(index.saturating_sub(1))
                    .map(|item| item.product.id.clone());
                match id {
                    Some(id) => app.state().cart().update_quantity(&id, quantity),
                    None => println!("No cart entry #{index}"),
                }
            }
            None => println!("Usage: qty <cart entry number> <quantity>"),
        },
        "clear-cart" => app.state().cart().clear(),

        // Auth
        "login" => match args.as_slice() {
            [email, password] => app.submit_login(email, password).await,
            _ => println!("Usage: login <email> <password>"),
        },
        "register" => match args.as_slice() {
            [name, email, password, confirm, rest @ ..] => {
                let request = RegisterRequest {
                    name: (*name).to_owned(),
                    email: (*email).to_owned(),
                    password: SecretString::from((*password).to_owned()),
                    confirm_password: SecretString::from((*confirm).to_owned()),
                    role: Role::Customer,
                    phone: rest.first().map(|phone| (*phone).to_owned()),
                    address: None,
                };
                app.submit_registration(request).await;
            }
            _ => println!("Usage: register <name> <email> <password> <confirm> [phone]"),
        },
        "logout" => {
            app.logout();
            println!("Logged out");
        }

        _ => println!("Unknown command '{command}'. Try 'help'."),
    }
}

/// Route a page request to whichever paginated view is showing.
async fn change_page(app: &mut AppShell, request: PageRequest) {
    match app.current_view() {
        View::Home => app.products.change_page(request).await,
        View::Categories => app.categories.change_page(request).await,
        _ => println!("Nothing to paginate here"),
    }
}

/// The nth (1-based) product currently displayed, after filtering.
fn displayed_product(app: &AppShell, index: usize) -> Option<Product> {
    let filtered = match app.current_view() {
        View::Home => app.products.filtered(),
        View::Categories => app.categories.filtered(),
        _ => return None,
    };
    filtered.get(index.saturating_sub(1)).map(|p| (*p).clone())
}

fn parse_index_and_quantity(args: &[&str]) -> Option<(usize, u32)> {
    let index = args.first()?.parse::<usize>().ok()?;
    let quantity = match args.get(1) {
        Some(raw) => raw.parse::<u32>().ok()?,
        None => 1,
    };
    Some((index, quantity))
}

// =============================================================================
// Rendering
// =============================================================================

fn render(app: &AppShell) {
    println!();
    match app.current_view() {
        View::Home => render_products(app),
        View::Categories => render_categories(app),
        View::Login => render_login(app),
        View::Signup => println!("-- Sign up --\nregister <name> <email> <password> <confirm> [phone]"),
        View::Cart => render_cart(app),
        View::Profile => render_profile(app),
    }
}

fn render_products(app: &AppShell) {
    let view = &app.products;
    println!("-- Products (page {}/{}) --", view.current_page(), view.total_pages());

    if let Some(message) = view.state().error() {
        println!("! {message}");
    }
    if view.state().is_loading() {
        println!("loading...");
        return;
    }

    for (index, product) in view.filtered().iter().enumerate() {
        print_product_line(index + 1, product);
    }
    println!(
        "showing through {} of {} products",
        view.end_product_index(),
        view.total_count()
    );
}

fn render_categories(app: &AppShell) {
    let browser = &app.categories;

    if let Some(category) = browser.selected() {
        println!(
            "-- {} (page {}/{}) --",
            category.name,
            browser.current_page(),
            browser.total_pages()
        );
        if let Some(message) = browser.products_state().error() {
            println!("! {message}");
        }
        for (index, product) in browser.filtered().iter().enumerate() {
            print_product_line(index + 1, product);
        }
        return;
    }

    println!("-- Categories --");
    if let Some(message) = browser.categories_state().error() {
        println!("! {message}");
    }
    for (index, category) in browser.categories().iter().enumerate() {
        println!("{:>3}. {}", index + 1, category.name);
    }
    println!("('open <n>' to browse a category)");
}

fn render_login(app: &AppShell) {
    println!("-- Log in --");
    if let Some(message) = app.login_error() {
        println!("! {message}");
    }
    if app.is_logged_in() {
        let auth = app.auth();
        println!(
            "Logged in as {} <{}> ({})",
            auth.user_name().unwrap_or_default(),
            auth.user_email().unwrap_or_default(),
            auth.user_role().unwrap_or_default()
        );
    } else {
        println!("login <email> <password>");
    }
}

fn render_cart(app: &AppShell) {
    let cart = app.state().cart();
    println!("-- Cart --");

    let items = cart.items();
    if items.is_empty() {
        println!("(empty)");
        return;
    }

    for (index, item) in items.iter().enumerate() {
        println!(
            "{:>3}. {} x{} @ {} = {}",
            index + 1,
            item.product.name,
            item.quantity,
            item.product.discounted_price().round_dp(2),
            item.line_total().round_dp(2)
        );
    }
    println!(
        "total: {} items, {}",
        cart.total_count(),
        cart.total_value().round_dp(2)
    );
}

fn render_profile(app: &AppShell) {
    let profile = &app.profile;
    println!("-- Profile --");
    if let Some(message) = profile.error() {
        println!("! {message}");
    }
    let user = profile.user();
    println!("name:  {}", user.name);
    println!("email: {}", user.email);
    println!("phone: {}", user.phone);
    println!("role:  {}", user.role);
}

fn print_product_line(index: usize, product: &Product) {
    let stars: String = star_breakdown(product.rating)
        .iter()
        .map(|star| match star {
            Star::Full => '★',
            Star::Half | Star::Empty => '☆',
        })
        .collect();

    println!(
        "{:>3}. {} [{}] {} {} -> {} ({}% off)",
        index,
        product.name,
        product.category_name(),
        stars,
        product.price.round_dp(2),
        product.discounted_price().round_dp(2),
        product.discount
    );
}

fn print_toasts(app: &AppShell) {
    for toast in app.state().toasts().messages() {
        println!("[{}] {}", toast.level.as_str(), toast.text);
    }
}

fn print_help() {
    println!(
        "commands:\n  \
         go <home|categories|signup|login|cart|profile>\n  \
         page <n> | next | prev\n  \
         open <n> | back\n  \
         search <text> | clear-search\n  \
         add <n> [qty] | remove <n> | qty <n> <q> | clear-cart\n  \
         login <email> <password> | register <name> <email> <pw> <confirm> [phone] | logout\n  \
         quit"
    );
}
