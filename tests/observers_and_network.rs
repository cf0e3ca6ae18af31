use std::cell::RefCell;
use std::rc::Rc;

use domglue::{
    AjaxBody, AjaxError, AjaxOptions, AjaxResponse, Host, MutationKind, MutationRecord,
    ObserveOptions, observer_callback,
};

#[test]
fn child_list_mutations_arrive_in_one_batch() -> domglue::Result<()> {
    let host = Host::from_html("<ul id='list'></ul><li id='a'>a</li>")?;
    let list = host.select("#list")?;

    let batches: Rc<RefCell<Vec<Vec<MutationRecord>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&batches);
    list.observe(
        ObserveOptions {
            child_list: true,
            ..Default::default()
        },
        observer_callback(move |_, records| sink.borrow_mut().push(records.to_vec())),
    );

    let a = host.get("#a")?.unwrap();
    list.append(a)?;
    list.remove_children();

    assert_eq!(host.deliver_mutations(), 2);
    {
        let batches = batches.borrow();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 2);
        assert_eq!(batches[0][0].kind, MutationKind::ChildList);
        assert_eq!(batches[0][0].added, vec![a]);
        assert_eq!(batches[0][1].removed, vec![a]);
    }

    // Nothing queued means nothing delivered.
    assert_eq!(host.deliver_mutations(), 0);
    Ok(())
}

#[test]
fn only_opted_in_kinds_are_recorded() -> domglue::Result<()> {
    let host = Host::from_html("<div id='d'></div>")?;
    let d = host.select("#d")?;

    let names: Rc<RefCell<Vec<Option<String>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&names);
    d.observe(
        ObserveOptions {
            attributes: true,
            ..Default::default()
        },
        observer_callback(move |_, records| {
            for record in records {
                sink.borrow_mut().push(record.attribute_name.clone());
            }
        }),
    );

    d.set_attr("role", "note").add_class("x").css("color: red;");
    d.set_text("ignored, child_list is not observed");
    host.deliver_mutations();

    assert_eq!(
        *names.borrow(),
        [
            Some("role".to_string()),
            Some("class".to_string()),
            Some("style".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn subtree_option_widens_the_scope() -> domglue::Result<()> {
    let host = Host::from_html("<div id='root'><p id='kid'>k</p></div>")?;
    let root = host.select("#root")?;
    let kid = host.select("#kid")?;

    let count = Rc::new(RefCell::new(0usize));
    let sink = Rc::clone(&count);
    root.observe(
        ObserveOptions::all(),
        observer_callback(move |_, records| *sink.borrow_mut() += records.len()),
    );

    kid.set_attr("data-x", "1");
    host.deliver_mutations();
    assert_eq!(*count.borrow(), 1);

    // Without subtree the same mutation stays out of scope.
    root.observe(
        ObserveOptions {
            attributes: true,
            ..Default::default()
        },
        observer_callback(|_, _| panic!("descendant mutation leaked into non-subtree observer")),
    );
    kid.set_attr("data-x", "2");
    host.deliver_mutations();
    Ok(())
}

#[test]
fn a_second_observe_replaces_the_first() -> domglue::Result<()> {
    let host = Host::from_html("<div id='d'></div>")?;
    let d = host.select("#d")?;

    let first_hits = Rc::new(RefCell::new(0usize));
    let second_hits = Rc::new(RefCell::new(0usize));

    let sink = Rc::clone(&first_hits);
    d.observe(
        ObserveOptions::all(),
        observer_callback(move |_, _| *sink.borrow_mut() += 1),
    );
    let sink = Rc::clone(&second_hits);
    d.observe(
        ObserveOptions::all(),
        observer_callback(move |_, _| *sink.borrow_mut() += 1),
    );

    d.set_attr("role", "note");
    host.deliver_mutations();

    assert_eq!(*first_hits.borrow(), 0);
    assert_eq!(*second_hits.borrow(), 1);
    Ok(())
}

#[test]
fn remove_observer_is_safe_without_a_subscription() -> domglue::Result<()> {
    let host = Host::from_html("<div id='d'></div>")?;
    let d = host.select("#d")?;

    d.remove_observer();

    d.observe(
        ObserveOptions::all(),
        observer_callback(|_, _| panic!("observer fired after removal")),
    );
    d.remove_observer();
    d.set_attr("role", "note");
    assert_eq!(host.deliver_mutations(), 0);
    Ok(())
}

#[test]
fn in_place_text_edit_is_character_data() -> domglue::Result<()> {
    let host = Host::from_html("<p id='p'>old</p>")?;
    let p = host.select("#p")?;

    let kinds: Rc<RefCell<Vec<MutationKind>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&kinds);
    p.observe(
        ObserveOptions::all(),
        observer_callback(move |_, records| {
            for record in records {
                sink.borrow_mut().push(record.kind);
            }
        }),
    );

    // A sole text child is edited in place; rebuilding from empty is a
    // child-list change.
    p.set_text("new");
    p.set_text("");
    p.set_text("again");
    host.deliver_mutations();

    assert_eq!(
        *kinds.borrow(),
        [
            MutationKind::CharacterData,
            MutationKind::ChildList,
            MutationKind::ChildList,
        ]
    );
    Ok(())
}

#[test]
fn empty_observe_options_match_nothing() -> domglue::Result<()> {
    let host = Host::from_html("<div id='d'></div>")?;
    let d = host.select("#d")?;

    d.observe_default(observer_callback(|_, _| {
        panic!("empty options observed a mutation")
    }));
    d.set_attr("role", "note").set_text("x");
    assert_eq!(host.deliver_mutations(), 0);
    Ok(())
}

#[test]
fn ajax_404_reports_fetch_failure_exactly_once() -> domglue::Result<()> {
    let host = Host::new();
    host.set_request_handler(|_| AjaxResponse::status(404));

    let outcomes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&outcomes);
    host.ajax(AjaxOptions::get("/missing"), move |outcome| {
        sink.borrow_mut().push(outcome);
    });

    assert_eq!(host.run_pending_requests(), 1);
    assert_eq!(host.run_pending_requests(), 0);

    let outcomes = outcomes.borrow();
    assert_eq!(outcomes.len(), 1);
    match &outcomes[0] {
        Err(AjaxError::Fetch { status, state }) => {
            assert_eq!(*status, 404);
            assert_eq!(state.code(), 4);
        }
        other => panic!("expected fetch failure, got {other:?}"),
    }
    assert!(
        outcomes[0]
            .as_ref()
            .unwrap_err()
            .to_string()
            .starts_with("Fetch failed")
    );
    Ok(())
}

#[test]
fn ajax_json_parses_the_body() -> domglue::Result<()> {
    let host = Host::new();
    host.set_request_handler(|request| {
        assert_eq!(request.method, "GET");
        if request.url == "/who.json" {
            AjaxResponse::ok(r#"{"name": "arya"}"#)
        } else {
            AjaxResponse::status(500)
        }
    });

    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    host.ajax(AjaxOptions::get("/who.json").json(), move |outcome| {
        *sink.borrow_mut() = Some(outcome);
    });
    host.flush()?;

    match seen.borrow().as_ref() {
        Some(Ok(AjaxBody::Json(value))) => assert_eq!(value["name"], "arya"),
        other => panic!("expected parsed json, got {other:?}"),
    }
    Ok(())
}

#[test]
fn ajax_json_parse_failure_is_reported_through_the_callback() -> domglue::Result<()> {
    let host = Host::new();
    host.set_request_handler(|_| AjaxResponse::ok("{broken"));

    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    host.ajax(AjaxOptions::get("/bad.json").json(), move |outcome| {
        *sink.borrow_mut() = Some(outcome);
    });
    host.run_pending_requests();

    assert!(matches!(
        seen.borrow().as_ref(),
        Some(Err(AjaxError::Parse(_)))
    ));
    Ok(())
}

#[test]
fn local_option_tolerates_status_zero() -> domglue::Result<()> {
    let host = Host::new();
    // No handler registered: every request completes with status 0.

    let plain = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&plain);
    host.ajax(AjaxOptions::get("file:///page.html"), move |outcome| {
        *sink.borrow_mut() = Some(outcome);
    });

    let local = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&local);
    host.ajax(
        AjaxOptions::get("file:///page.html").local(),
        move |outcome| {
            *sink.borrow_mut() = Some(outcome);
        },
    );

    host.run_pending_requests();
    assert!(matches!(
        plain.borrow().as_ref(),
        Some(Err(AjaxError::Fetch { status: 0, .. }))
    ));
    assert!(matches!(
        local.borrow().as_ref(),
        Some(Ok(AjaxBody::Text(text))) if text.is_empty()
    ));
    Ok(())
}

#[test]
fn requests_resolve_fifo() -> domglue::Result<()> {
    let host = Host::new();
    host.set_request_handler(|request| AjaxResponse::ok(request.url.clone()));

    let order = Rc::new(RefCell::new(Vec::new()));
    for url in ["/first", "/second", "/third"] {
        let sink = Rc::clone(&order);
        host.ajax(AjaxOptions::get(url), move |outcome| {
            if let Ok(AjaxBody::Text(text)) = outcome {
                sink.borrow_mut().push(text);
            }
        });
    }

    assert_eq!(host.run_pending_requests(), 3);
    assert_eq!(*order.borrow(), ["/first", "/second", "/third"]);
    Ok(())
}
