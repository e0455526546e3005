use anyhow::Result;
use baledt::input::ScriptedPrompter;
use baledt::{App, Cursor};
use tempfile::TempDir;

fn scripted_app(lines: &[&str]) -> App<ScriptedPrompter> {
    App::with_prompter(ScriptedPrompter::new(lines))
}

fn buffer_of(app: &App<ScriptedPrompter>) -> Vec<String> {
    app.session().buffer.lines().to_vec()
}

#[test]
fn test_statement_entry_session() -> Result<()> {
    let mut app = scripted_app(&[
        "\tbalr\tr12,0",
        "\tusing\t*,r12",
        "loop\tmvi\t0(r5),c'0'",
    ]);
    app.run()?;

    assert_eq!(
        buffer_of(&app),
        vec![
            "         BALR  R12,0",
            "         USING *,R12",
            "LOOP     MVI   0(R5),C'0'",
        ]
    );
    // EOF で抜けた後も QUIT と違い running のまま
    assert!(app.is_running());
    Ok(())
}

#[test]
fn test_save_and_read_round_trip() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("prog.bal");
    let path_str = path.display().to_string();

    // Write a short program and save it
    let mut writer = scripted_app(&[
        "start\tbalr\tr12,0",
        "\tsvc\t3",
        "SAVE",
        path_str.as_str(),
        "QUIT",
    ]);
    writer.run()?;

    let saved = std::fs::read_to_string(&path).unwrap();
    assert_eq!(saved, "START    BALR  R12,0\n         SVC   3\n");

    // Read it back into a fresh session
    let mut reader = scripted_app(&["READ", path_str.as_str(), "", "QUIT"]);
    reader.run()?;

    assert_eq!(buffer_of(&reader), buffer_of(&writer));
    Ok(())
}

#[test]
fn test_read_inserts_after_target_line() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("body.bal");
    std::fs::write(&path, "INSERTED1\nINSERTED2\n").unwrap();
    let path_str = path.display().to_string();

    let mut app = scripted_app(&["\ta\tb", "\tc\td", "READ", path_str.as_str(), "0", "QUIT"]);
    app.run()?;

    assert_eq!(
        buffer_of(&app),
        vec![
            "         A     B",
            "INSERTED1",
            "INSERTED2",
            "         C     D",
        ]
    );
    assert_eq!(app.session().cursor, Cursor::At(3));
    Ok(())
}

#[test]
fn test_save_empty_answer_reuses_name() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("kept.bal");
    let path_str = path.display().to_string();

    // 二度目の SAVE は空回答で同じファイルに上書き
    let mut app = scripted_app(&[
        "\ta\tb",
        "SAVE",
        path_str.as_str(),
        "\tc\td",
        "SAVE",
        "",
        "QUIT",
    ]);
    app.run()?;

    let saved = std::fs::read_to_string(&path).unwrap();
    assert_eq!(saved, "         A     B\n         C     D\n");
    assert_eq!(app.session().save_name, path_str);
    Ok(())
}

#[test]
fn test_editing_commands_rearrange_buffer() -> Result<()> {
    let mut app = scripted_app(&[
        "\tlr\tr1,r2",
        "\tlr\tr3,r4",
        "\tlr\tr5,r6",
        "D1",
        "C0,1",
        "G1/R5/R7",
        "QUIT",
    ]);
    app.run()?;

    assert_eq!(
        buffer_of(&app),
        vec![
            "         LR    R1,R2",
            "         LR    R7,R6",
            "         LR    R1,R2",
        ]
    );
    Ok(())
}

#[test]
fn test_exchange_takes_next_entered_line() -> Result<()> {
    let mut app = scripted_app(&["\ta\tb", "\tc\td", "E0", "\tx\ty", "QUIT"]);
    app.run()?;

    assert_eq!(
        buffer_of(&app),
        vec!["         X     Y", "         C     D"]
    );
    Ok(())
}

#[test]
fn test_quit_stops_consuming_input() -> Result<()> {
    let mut app = scripted_app(&["\ta\tb", "QUIT", "\tc\td"]);
    app.run()?;

    assert!(!app.is_running());
    assert_eq!(buffer_of(&app), vec!["         A     B"]);
    Ok(())
}

#[test]
fn test_failed_commands_keep_session_alive() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.bal");
    let missing_str = missing.display().to_string();

    let mut app = scripted_app(&[
        "D99",
        "XYZZY",
        "READ",
        missing_str.as_str(),
        "",
        "\ta\tb",
        "QUIT",
    ]);
    app.run()?;

    assert_eq!(buffer_of(&app), vec!["         A     B"]);
    Ok(())
}

#[test]
fn test_comment_lines_bypass_formatting() -> Result<()> {
    let mut app = scripted_app(&["* set up base register", "\tbalr\tr12,0", "QUIT"]);
    app.run()?;

    assert_eq!(
        buffer_of(&app),
        vec!["* SET UP BASE REGISTER", "         BALR  R12,0"]
    );
    Ok(())
}
