//! Example: install the normalizer on a page and load a carousel late

use looparia::{Config, Page, telemetry};
use looparia_dom::NodeId;

const CAROUSEL: &str = r#"
    <div class="swiper elementor-loop-container elementor-grid" role="list">
        <div class="swiper-wrapper">
            <div class="swiper-slide" role="listitem">One</div>
            <div class="swiper-slide" role="listitem">Two</div>
        </div>
        <span class="swiper-notification"></span>
    </div>
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    telemetry::init_logging(&config.log_filter);

    let document = looparia_html::parse("<main><h1>Shop</h1></main>")?;
    let mut page = Page::new(document);
    let mut fix = looparia::initialize(&mut page, config)?;

    page.finish_loading();
    fix.run_until_idle(&mut page);

    // A lazy loader drops in a carousel after load.
    let body = page.document().body();
    page.inject_html(body, CAROUSEL)?;
    fix.run_until_idle(&mut page);

    println!("looparia v{}", looparia::VERSION);
    let tree = page.document().tree();
    for id in tree.descendants(NodeId::ROOT) {
        let Some(elem) = tree.element(id) else { continue };
        if let Some(role) = elem.get_attr("role") {
            println!(
                "<{} class={:?}> role={role} label={:?}",
                elem.tag,
                elem.get_attr("class").unwrap_or_default(),
                elem.get_attr("aria-label"),
            );
        }
    }

    let stats = fix.stats();
    println!("{} passes, {} writes", stats.passes, stats.writes);
    Ok(())
}
