//! Storefront Demo - A scripted visit to the fixture page
//!
//! Boots every behavior on the fixture storefront and plays a short session:
//! - autoplay, arrow keys and a swipe on the hero slider
//! - the mobile menu
//! - product filter tabs
//! - a failed, then successful, contact form submission
//! - scrolling the page to reveal cards and load the lazy image
//!
//! Run with: RUST_LOG=site_behaviors=debug cargo run --example storefront

use site_behaviors::features::form::SUBMIT_SELECTOR;
use site_behaviors::fixture::storefront_page;
use site_behaviors::{Page, ReadyState, ScrollBehavior, SiteConfig, boot, ms};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn q(page: &Page, selector: &str) -> site_behaviors::ElementId {
    page.document()
        .query(selector)
        .ok()
        .flatten()
        .unwrap_or_else(|| panic!("fixture is missing {selector}"))
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let page = storefront_page();
    page.set_ready_state(ReadyState::Loading);
    let handle = boot(&page, SiteConfig::default());
    println!("booted before parse: {}", handle.is_ready());
    page.finish_parsing();

    let Some(site) = handle.site() else {
        eprintln!("startup failed");
        return;
    };

    // ----- Hero slider -----
    if let Some(carousel) = &site.carousel {
        page.advance(ms(5000));
        println!("after 5s autoplay: slide {}", carousel.current_index());
        page.key_down("ArrowRight");
        println!("after ArrowRight: slide {}", carousel.current_index());
        page.swipe(q(&page, ".slider"), 320.0, 180.0);
        println!("after left swipe: slide {}", carousel.current_index());
        page.set_hidden(true);
        println!("tab hidden, autoplay running: {}", carousel.is_playing());
        page.set_hidden(false);
        println!("tab visible, autoplay running: {}", carousel.is_playing());
    }

    // ----- Mobile menu -----
    if let Some(menu) = &site.menu {
        page.click(q(&page, ".hamburger"));
        println!("menu open: {}", menu.is_open());
        page.click(q(&page, ".nav-link"));
        println!("menu open after link: {}", menu.is_open());
    }

    // ----- Product filter -----
    page.click(q(&page, ".tab-btn[data-category=\"cleaners\"]"));
    page.advance(ms(50));
    {
        let doc = page.document();
        for card in doc.query_all(".product-card").unwrap_or_default() {
            println!(
                "  {} hidden={}",
                doc.attribute(card, "id").unwrap_or("?"),
                doc.has_class(card, "hidden")
            );
        }
    }

    // ----- Contact form -----
    if let Some(form) = &site.contact_form {
        let field = |id: &str| page.document().element_by_id(id);
        if let Some(email) = field("email") {
            page.type_into(email, "not-an-email");
        }
        page.submit(form.form());
        println!("focused after failed submit: {:?}", page.focused());

        for (id, value) in [
            ("firstName", "Grace"),
            ("lastName", "Hopper"),
            ("email", "grace@example.com"),
            ("phone", "5551234567"),
            ("message", "Please quote monthly floor care for two sites."),
        ] {
            if let Some(el) = field(id) {
                page.type_into(el, value);
            }
        }
        page.submit(form.form());
        let button = q(&page, SUBMIT_SELECTOR);
        println!("button while sending: {:?}", page.document().text(button));
        page.advance(ms(2000));
        println!("button after sending: {:?}", page.document().text(button));
    }

    // ----- Scroll -----
    for top in [900.0, 1600.0, 2400.0] {
        page.scroll_to(top, ScrollBehavior::Instant);
    }
    page.advance(ms(10));
    let lazy_image = page.document().element_by_id("lazy-1");
    if let Some(img) = lazy_image {
        page.finish_image_load(img);
        let doc = page.document();
        println!("lazy image src={:?} opacity={:?}", doc.attribute(img, "src"), doc.style(img).opacity);
    }

    page.unload();
}
