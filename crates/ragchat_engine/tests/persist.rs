use ragchat_engine::AtomicFileWriter;

#[test]
fn writes_and_replaces_target() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("nested").join("transcript.html");
    let writer = AtomicFileWriter::new(&target);

    writer.write("<p>first</p>").unwrap();
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "<p>first</p>");

    writer.write("<p>second</p>").unwrap();
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "<p>second</p>");

    let leftovers: Vec<_> = std::fs::read_dir(target.parent().unwrap())
        .unwrap()
        .collect();
    assert_eq!(leftovers.len(), 1);
}
