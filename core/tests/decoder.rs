use skillgap_core::decoder::{
    decode_employee_skills, decode_role_requirements, decode_rows, ROLE_REQUIREMENT_COLUMNS,
};

// ── Tests ────────────────────────────────────────────────────────────────────

/// Fields are assigned by position and trimmed.
#[test]
fn decodes_rows_positionally() {
    let rows = decode_rows(" Dev , Python ,4\nDev,SQL,3", &ROLE_REQUIREMENT_COLUMNS);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("role"), "Dev");
    assert_eq!(rows[0].get("required_skill"), "Python");
    assert_eq!(rows[0].get("required_level"), "4");
    assert_eq!(rows[1].get("required_skill"), "SQL");
}

/// CRLF and LF line endings are both accepted, trailing blank lines dropped.
#[test]
fn handles_crlf_and_trailing_blank_lines() {
    let rows = decode_rows("Dev,Python,4\r\nQA,Selenium,3\r\n\r\n,,\n", &ROLE_REQUIREMENT_COLUMNS);
    assert_eq!(rows.len(), 2, "blank and all-empty rows must be discarded");
    assert_eq!(rows[1].get("role"), "QA");
    assert_eq!(rows[1].get("required_level"), "3");
}

/// Empty text is a valid, empty table.
#[test]
fn empty_input_yields_no_rows() {
    assert!(decode_rows("", &ROLE_REQUIREMENT_COLUMNS).is_empty());
    assert!(decode_rows("   \n\r\n  ", &ROLE_REQUIREMENT_COLUMNS).is_empty());
    assert!(decode_employee_skills("").is_empty());
}

/// A header line repeating the expected columns is skipped.
#[test]
fn header_line_is_skipped() {
    let text = "role,required_skill,required_level\nDev,Python,4";
    let reqs = decode_role_requirements(text);
    assert_eq!(reqs.len(), 1, "header must not become a data row");
    assert_eq!(reqs[0].role, "Dev");
    assert_eq!(reqs[0].required_level, 4.0);
}

/// Short rows are padded with empty strings rather than dropped.
#[test]
fn short_rows_are_padded() {
    let rows = decode_rows("Dev,Python", &ROLE_REQUIREMENT_COLUMNS);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("required_level"), "");
}

/// Numeric columns are coerced; bad values become NaN and do not abort.
#[test]
fn employee_skills_coerce_levels() {
    let text = "\
employee_id,name,department,role,skill,skill_level
E1,Alice,Eng,Dev,Python,2
E1,Alice,Eng,Dev,Rust,4.5
E2,Bob,Ops,QA,Selenium,expert";
    let skills = decode_employee_skills(text);

    assert_eq!(skills.len(), 3);
    assert_eq!(skills[0].employee_id, "E1");
    assert_eq!(skills[0].name, "Alice");
    assert_eq!(skills[0].department, "Eng");
    assert_eq!(skills[0].skill_level, 2.0);
    assert_eq!(skills[1].skill_level, 4.5);
    assert!(skills[2].skill_level.is_nan(), "non-numeric level must become NaN");
}

/// A comma inside a value shifts the following columns. This is a known
/// limitation; the extra field is ignored.
#[test]
fn embedded_comma_misaligns_columns() {
    let reqs = decode_role_requirements("Dev,Python, Django,4");
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].required_skill, "Python");
    assert!(reqs[0].required_level.is_nan());
}
