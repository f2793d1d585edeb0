//! End-to-end conversions through the public API.

use snakeconv::logs::LOGGER;
use snakeconv::{
    convert, convert_file, summarize, write, ConvertError, ConvertOptions, Dialect, Layout,
};
use std::fs;
use tempfile::tempdir;

const TABLE_SOURCE: &str = "node_x\tnode_y\tn\tt\n\
    1.0\t1.0\t3\t0\n\
    2.0\t2.0\t3\t0\n\
    3.0\t3.0\t3\t0\n\
    1.5\t1.5\t2\t1\n\
    2.5\t2.5\t2\t1\n";

const BLOCKS_SOURCE: &str = "#QuimP11 node data\n\
    #frame 1\n\
    Node\tPosition\tfwd\tbwd\tnode_x\tnode_y\n\
    0\t0.0\t-1\t-1\t10.0\t20.0\n\
    1\t0.5\t-1\t-1\t11.0\t21.0\n\
    #frame 2\n\
    Node\tPosition\tfwd\tbwd\tnode_x\tnode_y\n\
    0\t0.0\t-1\t-1\t12.0\t22.0\n";

#[test]
fn table_source_to_long_layout() {
    LOGGER.set_quiet(true);
    let dir = tempdir().unwrap();
    let input = dir.path().join("snake.csv");
    let output = dir.path().join("snake_converted.csv");
    fs::write(&input, TABLE_SOURCE).unwrap();

    let options = ConvertOptions {
        output: snakeconv::OutputOptions {
            header: false,
            ..Default::default()
        },
        ..Default::default()
    };
    let conversion = convert_file(&input, &output, &options).unwrap();

    assert_eq!(conversion.records.len(), 5);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "0,0,1.0,1.0\n0,1,2.0,2.0\n0,2,3.0,3.0\n1,0,1.5,1.5\n1,1,2.5,2.5\n"
    );
}

#[test]
fn blocks_source_to_wide_layout() {
    LOGGER.set_quiet(true);
    let dir = tempdir().unwrap();
    let input = dir.path().join("cell_1.snQP");
    let output = dir.path().join("cell_1_converted.csv");
    fs::write(&input, BLOCKS_SOURCE).unwrap();

    let mut options = ConvertOptions::default();
    options.output.layout = Layout::Wide;
    options.output.time_per_frame = 5.0;

    let conversion = convert_file(&input, &output, &options).unwrap();
    assert_eq!(conversion.info.dialect, Dialect::Blocks);
    assert_eq!(conversion.info.headers[4], "node_x");

    let content = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("# time_0"));
    assert_eq!(lines[1], "0.000000 10.000000 20.000000 11.000000 21.000000");
    assert_eq!(lines[2], "5.000000 12.000000 22.000000");
}

#[test]
fn convert_then_write_separately() {
    LOGGER.set_quiet(true);
    let dir = tempdir().unwrap();
    let input = dir.path().join("snake.tsv");
    let output = dir.path().join("out.txt");
    fs::write(&input, TABLE_SOURCE).unwrap();

    let options = ConvertOptions::default();
    let conversion = convert(&input, &options.source).unwrap();
    write(&conversion.records, &output, &options.output).unwrap();

    let content = fs::read_to_string(&output).unwrap();
    assert_eq!(content.lines().next(), Some("frame,node,x,y"));
    assert_eq!(content.lines().count(), 6);

    let summary = summarize(&conversion.records).unwrap();
    assert_eq!(summary.frame_count, 2);
    assert_eq!(summary.node_counts, vec![2, 3]);
}

#[test]
fn empty_source_writes_nothing() {
    LOGGER.set_quiet(true);
    let dir = tempdir().unwrap();
    let input = dir.path().join("snake.csv");
    let output = dir.path().join("snake_converted.csv");
    fs::write(&input, "node_x\tnode_y\tn\tt\n").unwrap();

    let err = convert_file(&input, &output, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::EmptyInput));
    assert!(!output.exists());
}

#[test]
fn malformed_source_keeps_previous_output() {
    LOGGER.set_quiet(true);
    let dir = tempdir().unwrap();
    let input = dir.path().join("snake.csv");
    let output = dir.path().join("snake_converted.csv");
    fs::write(&input, "node_x\tn\tt\n1.0\t1\t0\n").unwrap();
    fs::write(&output, "earlier run").unwrap();

    let err = convert_file(&input, &output, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::MalformedInput(_)));
    assert_eq!(fs::read_to_string(&output).unwrap(), "earlier run");
}

#[test]
fn unwritable_destination() {
    LOGGER.set_quiet(true);
    let dir = tempdir().unwrap();
    let input = dir.path().join("snake.csv");
    fs::write(&input, TABLE_SOURCE).unwrap();
    let output = dir.path().join("no_such_dir").join("out.csv");

    let err = convert_file(&input, &output, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::IoWrite { .. }));
}
