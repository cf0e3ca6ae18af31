use domglue::{Error, Host, callback};

#[test]
fn select_wraps_the_first_match() -> domglue::Result<()> {
    let host = Host::from_html("<div id='select-me'><p class='x'>a</p></div>")?;
    let div = host.select("#select-me")?;
    assert_eq!(div.node(), host.get("#select-me")?.unwrap());
    Ok(())
}

#[test]
fn wrap_then_read_back_matches_direct_host_queries() -> domglue::Result<()> {
    let host = Host::from_html("<div id='w' class='a b' data-x='1'>txt</div>")?;
    let w = host.select("#w")?;

    assert_eq!(w.node(), host.get("#w")?.unwrap());
    assert_eq!(w.parent()?.node(), host.document().node());
    assert_eq!(w.class_list(), vec!["a", "b"]);
    assert_eq!(w.attr("data-x").as_deref(), Some("1"));
    assert_eq!(w.text(), "txt");
    Ok(())
}

#[test]
fn missing_selector_degrades_to_inert_placeholder() -> domglue::Result<()> {
    let host = Host::from_html("<div id='only'></div>")?;
    let ghost = host.select("not-existing")?;

    // The chain stays callable: binding and mutating are safe no-ops.
    ghost.on("click", callback(|_, _| {}));
    ghost.add_class("x").css("color: red;").set_text("boo");
    assert!(ghost.class_list().is_empty());
    assert!(!ghost.is("connected")?);
    assert_eq!(ghost.text(), "boo");
    Ok(())
}

#[test]
fn malformed_selector_text_fails_construction() -> domglue::Result<()> {
    let host = Host::from_html("<div></div>")?;
    assert!(matches!(host.select(""), Err(Error::InvalidSelector(_))));
    assert!(matches!(
        host.select("div:first-child"),
        Err(Error::UnsupportedSelector(_))
    ));
    Ok(())
}

#[test]
fn wrapping_a_text_node_is_rejected() -> domglue::Result<()> {
    let host = Host::from_html("<p id='p'>words</p>")?;
    let text = host.select("#p")?.children_raw()[0];
    assert!(matches!(host.wrap(text), Err(Error::InvalidSelector(_))));
    Ok(())
}

#[test]
fn parent_of_detached_node_is_a_structure_error() -> domglue::Result<()> {
    let host = Host::from_html("<div id='d'></div>")?;
    let d = host.select("#d")?;
    d.remove()?;
    assert!(matches!(d.parent(), Err(Error::Structure(_))));
    Ok(())
}

#[test]
fn remove_detaches_and_double_remove_errors() -> domglue::Result<()> {
    let host = Host::from_html("<div><span id='remove-me'>x</span></div>")?;
    assert!(host.get("#remove-me")?.is_some());

    let span = host.select("#remove-me")?;
    span.remove()?;
    assert_eq!(host.get("#remove-me")?, None);
    assert!(matches!(span.remove(), Err(Error::Structure(_))));
    Ok(())
}

#[test]
fn replace_swaps_a_direct_child() -> domglue::Result<()> {
    let host = Host::from_html(
        "<div id='replace'><span id='old'>o</span></div><span id='new'>n</span>",
    )?;
    let div = host.select("#replace")?;
    let old = host.get("#old")?.unwrap();
    let new = host.get("#new")?.unwrap();

    div.replace(new, old)?;
    assert_eq!(div.children_raw(), vec![new]);
    assert_eq!(host.get("#old")?, None);

    // The detached node is no longer a direct child.
    assert!(matches!(div.replace(new, old), Err(Error::Structure(_))));
    Ok(())
}

#[test]
fn append_moves_a_node_to_the_end() -> domglue::Result<()> {
    let host = Host::from_html("<div id='append'></div><span id='new'>n</span>")?;
    let div = host.select("#append")?;
    assert!(div.children_raw().is_empty());

    let new = host.get("#new")?.unwrap();
    div.append(new)?;
    assert_eq!(div.children_raw(), vec![new]);
    Ok(())
}

#[test]
fn remove_children_drains_everything() -> domglue::Result<()> {
    let host = Host::from_html("<div id='father'><p>a</p>between<p>b</p></div>")?;
    let father = host.select("#father")?;
    assert!(!father.html().is_empty());

    father.remove_children();
    assert!(father.html().is_empty());
    assert!(father.is("empty")?);
    Ok(())
}

#[test]
fn deep_clone_matches_markup_and_stays_disconnected() -> domglue::Result<()> {
    let host = Host::from_html("<div id='clone-me' class='c'><p>kid<b>!</b></p></div>")?;
    let source = host.select("#clone-me")?;

    let deep = host.wrap(source.clone_node(true))?;
    assert_eq!(deep.html(), source.html());
    assert_eq!(deep.attr("class").as_deref(), Some("c"));
    assert!(!deep.is("connected")?);

    let shallow = host.wrap(source.clone_node(false))?;
    assert!(shallow.is("empty")?);
    assert_eq!(shallow.attr("class").as_deref(), Some("c"));
    Ok(())
}

#[test]
fn css_applies_each_declaration_and_tolerates_format_noise() -> domglue::Result<()> {
    let host = Host::from_html("<div id='style-me'></div>")?;
    let ele = host.select("#style-me")?;

    ele.css("color: red; font-size: 1em;");
    assert_eq!(ele.style("color"), "red");
    assert_eq!(ele.style("fontSize"), "1em");

    ele.css("\n      color: blue;\n      font-size: 2em;\n      display: none;\n    ");
    assert_eq!(ele.style("color"), "blue");
    assert_eq!(ele.style("font-size"), "2em");
    assert_eq!(ele.style("display"), "none");

    // camelCase spellings land on the hyphenated property.
    ele.css("fontSize: 3em");
    assert_eq!(ele.style("font-size"), "3em");
    Ok(())
}

#[test]
fn class_mutations_and_paired_toggle_idempotence() -> domglue::Result<()> {
    let host = Host::from_html("<div id='class-test' class='kept'></div>")?;
    let ele = host.select("#class-test")?;

    ele.add_class("a-class");
    assert!(ele.has_class("a-class"));
    ele.remove_class("a-class");
    assert!(!ele.has_class("a-class"));

    let before = ele.class_list();
    ele.add_class("flip").toggle_class("flip");
    assert_eq!(ele.class_list(), before);

    ele.toggle_class("flip");
    assert!(ele.has_class("flip"));
    Ok(())
}

#[test]
fn text_getter_and_setter_are_distinct_operations() -> domglue::Result<()> {
    let host = Host::from_html("<div id='t'>hello <b>world</b></div>")?;
    let t = host.select("#t")?;
    assert_eq!(t.text(), "hello world");

    t.set_text("Winter is coming");
    assert_eq!(t.text(), "Winter is coming");

    // An empty-string set really clears; it is not a read.
    t.set_text("");
    assert_eq!(t.text(), "");
    assert!(t.is("empty")?);
    Ok(())
}

#[test]
fn html_round_trip() -> domglue::Result<()> {
    let host = Host::from_html("<div id='t'>old</div>")?;
    let t = host.select("#t")?;

    t.set_html("<span class=\"snow\">Winter has come</span>")?;
    assert_eq!(t.html(), "<span class=\"snow\">Winter has come</span>");
    assert_eq!(t.text(), "Winter has come");
    Ok(())
}

#[test]
fn value_and_regex_test() -> domglue::Result<()> {
    let host = Host::from_html("<input id='value' value='some value'>")?;
    let input = host.select("#value")?;

    assert_eq!(input.value(), "some value");
    assert_eq!(input.set_value("stark").value(), "stark");
    assert!(input.test("stark")?);
    assert!(!input.test("lannister")?);
    assert!(matches!(input.test("["), Err(Error::Regex(_))));
    Ok(())
}

#[test]
fn attribute_get_set_has_remove() -> domglue::Result<()> {
    let host = Host::from_html("<input id='attr' type='text'>")?;
    let input = host.select("#attr")?;

    assert_eq!(input.attr("type").as_deref(), Some("text"));
    assert_eq!(
        input.set_attr("type", "password").attr("type").as_deref(),
        Some("password")
    );
    assert!(input.has_attr("type"));
    input.remove_attr("type");
    assert!(!input.has_attr("type"));
    assert_eq!(input.attr("type"), None);
    Ok(())
}

#[test]
fn named_state_checks() -> domglue::Result<()> {
    let host = Host::from_html("<input id='i' checked required>")?;
    let input = host.select("#i")?;

    assert!(input.is("checked")?);
    assert!(input.is("required")?);
    assert!(!input.is("disabled")?);
    assert!(!input.is("readonly")?);
    assert!(input.is("connected")?);
    assert!(matches!(
        input.is("visible"),
        Err(Error::UnsupportedCheck(_))
    ));
    Ok(())
}

#[test]
fn all_materializes_every_match() -> domglue::Result<()> {
    let host = Host::from_html(
        "<p class='all'></p><p class='all'></p><i class='all'></i>\
         <b class='all'></b><u class='all'></u><span class='other'></span>",
    )?;
    assert_eq!(host.all(".all")?.len(), 5);
    assert_eq!(host.all("p.all")?.len(), 2);
    Ok(())
}

#[test]
fn parse_builds_an_inert_disconnected_fragment() -> domglue::Result<()> {
    let host = Host::from_html("<div id='mount'></div>")?;
    let fragment = host.parse("<li>one</li><li>two</li><script>window.x = 1;</script>")?;
    let wrapped = host.wrap(fragment)?;

    assert!(!wrapped.is("connected")?);
    let children = wrapped.children();
    assert_eq!(children.len(), 3);
    assert_eq!(children[0].text(), "one");
    assert_eq!(children[1].text(), "two");

    // Parsed content can be attached afterwards.
    host.select("#mount")?.append(children[0].node())?;
    assert_eq!(host.select("#mount")?.text(), "one");
    Ok(())
}

#[test]
fn image_builds_a_disconnected_img_node() -> domglue::Result<()> {
    let host = Host::new();

    let img = host.wrap(host.image("pics/a.png", Some("portrait")))?;
    assert_eq!(img.attr("src").as_deref(), Some("pics/a.png"));
    assert_eq!(img.attr("alt").as_deref(), Some("portrait"));
    assert!(!img.is("connected")?);

    let bare = host.wrap(host.image("pics/b.png", None))?;
    assert_eq!(bare.attr("alt").as_deref(), Some(""));
    Ok(())
}

#[test]
fn children_snapshot_is_not_live() -> domglue::Result<()> {
    let host = Host::from_html("<div id='d'><p>a</p><p>b</p></div>")?;
    let d = host.select("#d")?;
    let snapshot = d.children();
    assert_eq!(snapshot.len(), 2);

    d.remove_children();
    // The earlier snapshot still holds two (now detached) handles.
    assert_eq!(snapshot.len(), 2);
    assert!(d.children().is_empty());
    Ok(())
}
