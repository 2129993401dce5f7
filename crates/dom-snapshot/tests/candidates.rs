use dom_snapshot::{Document, ElementRef};
use xpath_locator::{
    absolute_xpath, element_info, CandidateGenerator, DocumentQuery, ElementSummary,
    GeneratorOptions, LocatorElement, StrategyKind,
};

const PAGE: &str = r##"<html>
<body>
  <form id="login" name="login-form">
    <input type="text" name="user" placeholder="User name"/>
    <input type="password" name="pass"/>
    <button id="submit-btn" class="btn btn-primary">Submit</button>
  </form>
  <div title="Say &quot;hi&quot;">Quote</div>
  <ul>
    <li/>
    <li/>
    <li/>
  </ul>
  <section class="cards">
    <article class="card active" data-kind="news" data-rank="1"><a href="/n/1">First</a></article>
    <article class="card" data-kind="news" data-rank="2"><a href="/n/2">Second</a></article>
  </section>
  <svg class="icon chart" role="img"><use xlink:href="#line" title="Chart"/></svg>
  <div class="actions"><button><span>Go</span></button><button>Go</button></div>
</body>
</html>"##;

fn page() -> Document {
    Document::parse_markup(PAGE).unwrap()
}

fn find<'d>(doc: &'d Document, pred: impl Fn(&ElementRef<'d>) -> bool) -> ElementRef<'d> {
    doc.element_refs().find(|e| pred(e)).expect("element present")
}

fn by_tag<'d>(doc: &'d Document, tag: &str, nth: usize) -> ElementRef<'d> {
    doc.element_refs()
        .filter(|e| e.tag_name() == tag)
        .nth(nth)
        .expect("element present")
}

#[test]
fn unique_id_comes_first_and_class_follows() {
    let doc = page();
    let generator = CandidateGenerator::new(&doc);
    let button = doc.element_by_id("submit-btn").unwrap();

    let candidates = generator.generate_candidates(&button);
    assert_eq!(candidates[0].kind, StrategyKind::Id);
    assert_eq!(candidates[0].xpath, r#"//*[@id="submit-btn"]"#);

    let class = candidates
        .iter()
        .find(|c| c.kind == StrategyKind::Class)
        .expect("class candidate");
    assert_eq!(class.xpath, r#"//button[@class="btn btn-primary"]"#);
    assert!(candidates
        .iter()
        .any(|c| c.xpath == r#"//button[contains(@class,"btn")]"#));
    assert!(candidates
        .iter()
        .any(|c| c.xpath == r#"//button[text()="Submit"]"#));

    let json = serde_json::to_value(&candidates[0]).unwrap();
    assert_eq!(json["type"], "ID");
    assert_eq!(json["xpath"], r#"//*[@id="submit-btn"]"#);
}

#[test]
fn quoted_attribute_value_is_escaped_and_still_verified() {
    let doc = page();
    let generator = CandidateGenerator::new(&doc);
    let div = by_tag(&doc, "div", 0);

    let candidates = generator.generate_candidates(&div);
    let title = candidates
        .iter()
        .find(|c| c.kind == StrategyKind::Attribute("title".to_string()))
        .expect("title candidate");
    assert_eq!(title.xpath, r#"//div[@title="Say &quot;hi&quot;"]"#);
    assert!(title.verified);
    assert_eq!(doc.select(&title.xpath).unwrap(), vec![div.node_id()]);
}

#[test]
fn bare_list_item_gets_only_a_position() {
    let doc = page();
    let generator = CandidateGenerator::new(&doc);
    let item = by_tag(&doc, "li", 1);

    let candidates = generator.generate_candidates(&item);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].kind, StrategyKind::Position);
    assert_eq!(candidates[0].xpath, "//ul/li[2]");
    assert!(!candidates[0].verified);
}

#[test]
fn data_attributes_skip_transient_classes() {
    let doc = page();
    let generator = CandidateGenerator::new(&doc);
    let first = by_tag(&doc, "article", 0);

    let candidates = generator.generate_candidates(&first);
    assert_eq!(candidates[0].kind, StrategyKind::DataAttributes);
    assert_eq!(
        candidates[0].xpath,
        r#"//*[@data-kind="news" and @data-rank="1"]"#
    );
    // `@class="card"` would pin the second article, not this one.
    assert!(candidates.iter().all(|c| c.kind != StrategyKind::Class));
    assert!(candidates
        .iter()
        .any(|c| c.xpath == r#"//article[contains(@class,"card")]"#));
    assert!(candidates.iter().any(|c| c.xpath == "//section/article[1]"));
}

#[test]
fn svg_token_classes_are_used() {
    let doc = page();
    let generator = CandidateGenerator::new(&doc);
    let svg = by_tag(&doc, "svg", 0);

    let candidates = generator.generate_candidates(&svg);
    assert!(candidates
        .iter()
        .any(|c| c.xpath == r#"//svg[@class="icon chart"]"#));
    assert!(candidates.iter().any(|c| c.xpath == r#"//svg[@role="img"]"#));
}

#[test]
fn failing_query_still_returns_other_candidates() {
    let doc = page();
    let options = GeneratorOptions {
        attribute_names: vec!["xlink:href".to_string(), "title".to_string()],
        ..GeneratorOptions::default()
    };
    let generator = CandidateGenerator::with_options(&doc, options);
    let target = by_tag(&doc, "use", 0);

    assert!(doc.count_matches(r##"//use[@xlink:href="#line"]"##).is_err());
    let candidates = generator.generate_candidates(&target);
    assert!(candidates.iter().any(|c| c.xpath == r#"//use[@title="Chart"]"#));
    assert!(candidates.iter().all(|c| !c.xpath.contains("xlink")));
}

#[test]
fn verified_candidates_select_exactly_their_element() {
    let doc = page();
    let generator = CandidateGenerator::new(&doc);

    for element in doc.element_refs() {
        for candidate in generator.generate_candidates(&element) {
            if !candidate.verified {
                continue;
            }
            assert_eq!(
                doc.select(&candidate.xpath).unwrap(),
                vec![element.node_id()],
                "{} does not pin {:?}",
                candidate.xpath,
                element
            );
        }
    }
}

#[test]
fn text_held_by_a_child_is_not_claimed_by_the_parent() {
    let doc = page();
    let generator = CandidateGenerator::new(&doc);
    let wrapper = by_tag(&doc, "button", 1);
    let direct = by_tag(&doc, "button", 2);
    assert_eq!(wrapper.text_content(), "Go");

    let candidates = generator.generate_candidates(&wrapper);
    assert!(candidates
        .iter()
        .all(|c| c.kind != StrategyKind::TextContent));
    assert_eq!(
        generator.best_xpath(&wrapper),
        r#"//div[contains(@class,"actions")]/button[1]"#
    );

    let candidates = generator.generate_candidates(&direct);
    let text = candidates
        .iter()
        .find(|c| c.kind == StrategyKind::TextContent)
        .expect("text candidate");
    assert_eq!(text.xpath, r#"//button[text()="Go"]"#);
    assert_eq!(doc.select(&text.xpath).unwrap(), vec![direct.node_id()]);
}

#[test]
fn generation_is_idempotent_and_duplicate_free() {
    let doc = page();
    let generator = CandidateGenerator::new(&doc);

    for element in doc.element_refs() {
        let first = generator.generate_candidates(&element);
        let second = generator.generate_candidates(&element);
        assert_eq!(first, second);

        let mut xpaths: Vec<&str> = first.iter().map(|c| c.xpath.as_str()).collect();
        xpaths.sort_unstable();
        xpaths.dedup();
        assert_eq!(xpaths.len(), first.len());
    }
}

#[test]
fn best_xpath_prefers_stable_hooks() {
    let doc = page();
    let generator = CandidateGenerator::new(&doc);

    let button = doc.element_by_id("submit-btn").unwrap();
    assert_eq!(generator.best_xpath(&button), r#"//*[@id="submit-btn"]"#);

    let user = find(&doc, |e| e.attribute("name").as_deref() == Some("user"));
    assert_eq!(generator.best_xpath(&user), r#"//*[@name="user"]"#);

    let link = find(&doc, |e| e.attribute("href").as_deref() == Some("/n/2"));
    assert_eq!(generator.best_xpath(&link), r#"//a[@href="/n/2"]"#);
}

#[test]
fn best_xpath_falls_back_to_smart_path() {
    let doc = page();
    let generator = CandidateGenerator::new(&doc);
    let item = by_tag(&doc, "li", 2);

    assert_eq!(generator.best_xpath(&item), "//ul/li[3]");
    assert_eq!(doc.select("//ul/li[3]").unwrap(), vec![item.node_id()]);
}

#[test]
fn smart_path_stops_at_id_and_uses_classes() {
    let doc = page();
    let generator = CandidateGenerator::new(&doc);

    let password = find(&doc, |e| e.attribute("type").as_deref() == Some("password"));
    assert_eq!(
        generator.smart_path(&password),
        r#"//form[@id="login"]/input[2]"#
    );

    let link = find(&doc, |e| e.attribute("href").as_deref() == Some("/n/1"));
    assert_eq!(
        generator.smart_path(&link),
        r#"//section[contains(@class,"cards")]/article[contains(@class,"card")]/a"#
    );
}

#[test]
fn absolute_xpath_resolves_back_to_the_element() {
    let doc = page();
    let item = by_tag(&doc, "li", 1);
    let path = absolute_xpath(&item);

    assert_eq!(path, "/html/body/ul/li[2]");
    assert_eq!(doc.select(&path).unwrap(), vec![item.node_id()]);

    let second = by_tag(&doc, "article", 1);
    assert_eq!(absolute_xpath(&second), "/html/body/section/article[2]");
}

#[test]
fn element_info_and_summary() {
    let doc = page();
    let options = GeneratorOptions::default();
    let button = doc.element_by_id("submit-btn").unwrap();

    assert_eq!(element_info(&button, &options), "button#submit-btn.btn.btn-primary");

    let summary = ElementSummary::capture(&button);
    assert_eq!(summary.tag_name, "button");
    assert_eq!(summary.id.as_deref(), Some("submit-btn"));
    assert_eq!(summary.text, "Submit");
    assert_eq!(summary.attributes.len(), 2);
}
