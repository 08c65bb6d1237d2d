use super::*;

#[test]
fn text_nodes_are_not_bindable() {
    let t: VNode<u32> = VNode::text("hi").attr("id", "x").on(HookSlot::Create, |_, _| {});
    assert!(!t.is_bindable());
    assert!(t.hooks().is_none());
    assert_eq!(t.tag, TEXT_TAG);
}

#[test]
fn element_builder_collects_attrs_hooks_and_children() {
    let v: VNode<u32> = VNode::element("div")
        .key("k")
        .id("target")
        .on(HookSlot::Create, |_, _| {})
        .on(HookSlot::Create, |_, _| {})
        .child(VNode::text("foo"));

    assert_eq!(v.key.as_deref(), Some("k"));
    assert_eq!(
        v.props.as_ref().unwrap().attrs.get("id").map(String::as_str),
        Some("target")
    );
    assert_eq!(v.hooks().unwrap().len(HookSlot::Create), 2);
    assert_eq!(v.children.len(), 1);
}
