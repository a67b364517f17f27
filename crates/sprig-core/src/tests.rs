#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::*;

    fn text(content: impl Into<Content>) -> Component {
        Component::new(ElementKind::Text(TextLevel::Span), Props::new().content(content))
    }

    fn mount_on(dom: &MemoryDom, view: impl Fn(&Component) + 'static) -> (Rc<ManualLoop>, Scheduler) {
        let mut renderer = Renderer::new(dom.clone(), "app").expect("host");
        let lp = Rc::new(ManualLoop::new());
        let scheduler = Scheduler::new(view, lp.clone(), move |write, readers, tree| {
            renderer.render(write, readers, tree)
        });
        scheduler.start();
        (lp, scheduler)
    }

    fn element(dom: &MemoryDom, path: &str) -> ElementKey {
        dom.element_by_id(path)
            .unwrap_or_else(|| panic!("no element at {path}"))
    }

    #[test]
    fn test_patch_then_structural_replace() {
        let label = signal("a".to_string());
        let editable = signal(false);
        let dom = MemoryDom::with_host("app");
        let (lp, scheduler) = mount_on(&dom, move |_| {
            let value = label.get();
            if editable.get() {
                Component::new(ElementKind::Input, Props::new().value(value));
            } else {
                text(value);
            }
        });
        insta::assert_snapshot!(dom.dump(), @r#"
        div id="app"
          div id="0"
            span id="0.0" "a"
        "#);

        let span = element(&dom, "0.0");
        let created = dom.created();
        label.set("b".into());
        lp.run_until_idle();
        assert_eq!(dom.created(), created);
        assert_eq!(dom.text_of(span).as_deref(), Some("b"));

        editable.set(true);
        lp.run_until_idle();
        assert!(!dom.contains(span));
        assert!(dom.created() > created);
        assert_eq!(scheduler.passes(), 3);
        insta::assert_snapshot!(dom.dump(), @r#"
        div id="app"
          div id="0"
            input id="0.0" value="b"
        "#);
    }

    #[test]
    fn test_nested_structural_change_keeps_siblings() {
        let armed = signal(false);
        let dom = MemoryDom::with_host("app");
        let (lp, _scheduler) = mount_on(&dom, move |_| {
            text("static");
            Component::new(ElementKind::Div, Props::default()).body(move |_| {
                if armed.get() {
                    Component::new(ElementKind::Button, Props::new().content("go"));
                } else {
                    Component::new(ElementKind::Span, Props::default());
                }
            });
        });
        let sibling = element(&dom, "0.0");
        let old_div = element(&dom, "0.1");

        armed.set(true);
        lp.run_until_idle();
        assert_eq!(element(&dom, "0.0"), sibling);
        assert!(!dom.contains(old_div));
        insta::assert_snapshot!(dom.dump(), @r#"
        div id="app"
          div id="0"
            span id="0.0" "static"
            div id="0.1"
              button id="0.1.0" "go"
        "#);
    }

    #[test]
    fn test_later_structural_changes_wait_and_never_clobber_the_host() {
        let s = signal(false);
        let t = signal(false);
        let dom = MemoryDom::with_host("app");
        let (lp, _scheduler) = mount_on(&dom, move |_| {
            text("keep me");
            Component::new(ElementKind::Div, Props::default()).body(move |_| {
                if s.get() {
                    Component::new(ElementKind::Button, Props::new().content("a"));
                }
            });
            Component::new(ElementKind::Div, Props::default()).body(move |_| {
                if s.get() {
                    Component::new(ElementKind::Div, Props::default()).body(move |_| {
                        if t.get() {
                            Component::new(ElementKind::Button, Props::new().content("b"));
                        }
                    });
                }
            });
        });

        s.set(true);
        lp.run_until_idle();
        t.set(true);
        lp.run_until_idle();
        insta::assert_snapshot!(dom.dump(), @r#"
        div id="app"
          div id="0"
            span id="0.0" "keep me"
            div id="0.1"
              button id="0.1.0" "a"
            div id="0.2"
        "#);
    }

    #[test]
    fn test_state_persists_across_rebuilds() {
        let dom = MemoryDom::with_host("app");
        let (lp, _scheduler) = mount_on(&dom, |_| {
            let counter = Component::new(ElementKind::Div, Props::default());
            let clicks = counter.state("clicks", || 0);
            counter.body(move |_| {
                let n = clicks.get();
                Component::new(
                    ElementKind::Button,
                    Props::new()
                        .content(format!("clicked {n}"))
                        .on(EventName::Click, move |_| clicks.update(|c| *c += 1)),
                );
            });
        });

        let button = element(&dom, "0.0.0");
        for _ in 0..2 {
            assert!(dom.click(button));
            lp.run_until_idle();
        }
        assert_eq!(element(&dom, "0.0.0"), button);
        assert_eq!(dom.text_of(button).as_deref(), Some("clicked 2"));
    }

    #[test]
    fn test_on_appear_runs_after_mount() {
        let dom = MemoryDom::with_host("app");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (s, d) = (seen.clone(), dom.clone());
        mount_on(&dom, move |_| {
            let (s2, d2) = (s.clone(), d.clone());
            Component::new(ElementKind::Div, Props::default()).on_appear(move |node| {
                let mounted = d2.element_by_id(node.path().as_str()).is_some();
                s2.borrow_mut().push((node.path().to_string(), mounted));
            });
            assert!(s.borrow().is_empty());
        });
        assert_eq!(*seen.borrow(), vec![("0.0".to_string(), true)]);
    }

    #[test]
    fn test_missing_host() {
        let dom = MemoryDom::with_host("root");
        let err = Renderer::new(dom, "app").err();
        assert_eq!(err, Some(Error::HostNotFound("app".into())));
        assert_eq!(
            Error::HostNotFound("app".into()).to_string(),
            "render host `#app` not found"
        );
    }

    #[test]
    fn test_write_during_pass_is_dropped() {
        let n = signal(0);
        let dom = MemoryDom::with_host("app");
        let (lp, scheduler) = mount_on(&dom, move |_| {
            let v = n.get();
            text(v);
            if v == 0 {
                schedule_effect(move || n.set(1));
            }
        });
        assert_eq!(n.get(), 1);
        assert_eq!(lp.pending_tasks(), 0);
        assert_eq!(scheduler.passes(), 1);
        assert_eq!(dom.text_of(element(&dom, "0.0")).as_deref(), Some("0"));
    }

    #[test]
    fn test_continuous_mode_redraws_every_frame() {
        let count = signal(0);
        let dom = MemoryDom::with_host("app");
        let (lp, scheduler) = mount_on(&dom, move |_| {
            text(count.get());
        });
        let el = element(&dom, "0.0");
        scheduler.start_continuous();

        count.set(7);
        assert_eq!(lp.run_until_idle(), 0);
        lp.tick_frame();
        assert_eq!(dom.text_of(el).as_deref(), Some("7"));

        scheduler.stop_continuous();
        count.set(8);
        assert_eq!(lp.tick_frame(), 0);
        lp.run_until_idle();
        assert_eq!(dom.text_of(el).as_deref(), Some("8"));
    }
}
