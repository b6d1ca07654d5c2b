use csv_cleaner::table::render_table;

#[test]
fn render_table_sizes_columns_to_widest_cell() {
    let headers = vec!["id".to_string(), "city".to_string()];
    let rows = vec![
        vec!["1".to_string(), "Reykjavík".to_string()],
        vec!["22".to_string(), "".to_string()],
    ];

    let rendered = render_table(&headers, &rows);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(
        lines,
        vec!["id  city", "---  ---------", "1   Reykjavík", "22"]
    );
}

#[test]
fn render_table_with_no_rows_prints_header_and_rule() {
    let headers = vec!["column".to_string()];
    let rendered = render_table(&headers, &[]);
    assert_eq!(rendered, "column\n------\n");
}
