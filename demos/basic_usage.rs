//! A tour of the library: finding nodes, iterating, reading data values,
//! building documents programmatically, and writing them back out.

use sprig::Document;

const SOURCE: &[u8] = b"
MultipleNodes
MultipleNodes
MultipleNodes

#NESTED
\tNestedNode
\tTargetNode
#

WithData {
\tText on line one
\tText on line two
} second_data
WithTypes true -50 123
";

fn find_nodes(doc: &Document) {
    println!("== find ==");

    let nested = doc.find("NESTED").expect("NESTED should exist");
    println!("found: {}", String::from_utf8_lossy(&nested.id));
    println!("missing: {:?}", doc.find("InvalidNode").is_some());
}

fn iterate_nodes(doc: &Document) {
    println!("\n== iteration ==");

    for node in doc.children_by_id("MultipleNodes") {
        println!("{}", String::from_utf8_lossy(&node.id));
    }
}

fn read_data(doc: &Document) {
    println!("\n== data access ==");

    let with_data = doc.find("WithData").expect("WithData should exist");
    for value in &with_data.data {
        println!("{:?}", String::from_utf8_lossy(value));
    }

    let with_types = doc.find("WithTypes").expect("WithTypes should exist");
    println!("bool: {:?}", with_types.bool_at(0));
    println!("int:  {:?}", with_types.int_at(1));
    println!("int:  {:?}", with_types.int_at(2));
}

fn build_document() {
    println!("\n== building ==");

    let mut doc = Document::default();

    doc.push_child(Document::new("EmptyNode"));

    let mut with_data = Document::new("NodeWithData");
    with_data.push_data("data1");
    with_data.push_data("data2");
    doc.push_child(with_data);

    let mut with_children = Document::new("NodeWithChildren");
    with_children.push_child(Document::new("ChildNode"));
    doc.push_child(with_children);

    // The same structure can also be appended from source fragments.
    sprig::parse_into(&mut doc, b"#AppendedScope\nChildNode\n#");

    print!("{}", String::from_utf8_lossy(&sprig::to_vec(&doc)));
}

fn zero_copy_view() {
    println!("\n== document view ==");

    // The view borrows from `buffer`, which must stay alive and untouched
    // for as long as the view is used.
    let mut buffer = SOURCE.to_vec();
    let view = sprig::parse_view(&mut buffer);
    print!("{}", String::from_utf8_lossy(&sprig::to_vec(&view)));
}

fn main() {
    let doc = sprig::parse(SOURCE);

    find_nodes(&doc);
    iterate_nodes(&doc);
    read_data(&doc);
    build_document();
    zero_copy_view();
}
