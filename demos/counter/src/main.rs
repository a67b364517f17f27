use sprig_core::Component;
use sprig_platform::{MountOptions, headless_with};
use sprig_ui::*;

fn app(root: &Component) {
    let count = root.state("count", || 0i32);
    let name = root.state("name", String::new);

    Text::new("Counter").as_title();
    Stack::new().vertical().body(move |_| {
        Text::new(format!("count: {}", count.get()));
        Stack::new().horizontal().body(move |_| {
            Button::new("-").on_click(move || count.update(|n| *n -= 1));
            Button::new("+").on_click(move || count.update(|n| *n += 1));
        });
        TextInput::new()
            .placeholder("your name")
            .value(name.get())
            .on_change_text(move |v| name.set(v));
        Div::new().body(move |_| {
            Text::new(format!("hello {}", name.get())).as_paragraph();
        });
    });
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let ui = headless_with(
        app,
        MountOptions {
            inspect: true,
            ..MountOptions::default()
        },
    )?;

    ui.click("0.1.1.1");
    ui.click("0.1.1.1");
    ui.click("0.1.1.0");
    ui.type_text("0.1.2", "sprig");

    log::info!("{} passes", ui.app.passes());
    if let Some(inspector) = ui.app.inspector() {
        log::info!("{}", inspector.borrow().hud.summary());
    }
    print!("{}", ui.dump());
    Ok(())
}
