use mortar_lang::{error::CompileErrorCode, parser::parse, CompileOptions, ScriptCompiler};

mod common;
use common::{compile, script, Recorder};

#[test]
fn references_are_replaced_by_values() {
    let compiled = compile(&script(
        r#"
        set $colour "1 0 0"

        material m
        {
            set $shine 10
            diffuse $colour
            specular $colour $shine
        }
        "#,
    ));
    assert!(compiled.success, "{:?}", compiled.codes());
    assert_eq!(
        compiled.output,
        [script(
            "
            material m
            {
                set $shine 10
                diffuse 1 0 0
                specular 1 0 0 10
            }
            "
        )]
    );
    assert_eq!(compiled.compiler.environment()["colour"], "1 0 0");
}

#[test]
fn inner_scopes_shadow_outer_scopes() {
    let compiled = compile(&script(
        "
        set $mode global

        material m
        {
            set $mode material
            technique
            {
                set $mode technique
                scheme $mode
            }
            technique
            {
                scheme $mode
            }
        }
        material n
        {
            scheme $mode
        }
        ",
    ));
    assert!(compiled.success, "{:?}", compiled.codes());
    let output = compiled.output.join("");
    assert!(output.contains("scheme technique"), "{output}");
    assert!(output.contains("scheme material"), "{output}");
    assert!(output.contains("scheme global"), "{output}");
}

#[test]
fn undefined_references_are_removed() {
    let compiled = compile(&script(
        "
        material m
        {
            diffuse $missing 1
            ambient 1 1 1
        }
        ",
    ));
    assert!(!compiled.success);
    assert_eq!(compiled.codes(), [CompileErrorCode::UndefinedVariable]);
    assert_eq!(compiled.compiler.errors()[0].line, 3);
    assert_eq!(
        compiled.output,
        [script(
            "
            material m
            {
                diffuse 1
                ambient 1 1 1
            }
            "
        )]
    );
}

#[test]
fn values_may_reference_other_variables() {
    let compiled = compile(&script(
        r#"
        set $red 1
        set $colour "$red 0 0"

        material m
        {
            diffuse $colour
        }
        "#,
    ));
    assert!(compiled.success, "{:?}", compiled.codes());
    assert!(compiled.output[0].contains("diffuse 1 0 0"));
}

#[test]
fn recursive_references_are_reported() {
    let compiled = compile(&script(
        r#"
        set $a "x $a"

        material m
        {
            diffuse $a
        }
        "#,
    ));
    assert!(!compiled.success);
    assert_eq!(compiled.codes(), [CompileErrorCode::RecursiveVariable]);
    assert!(compiled.output[0].contains("diffuse x\n"));
}

#[test]
fn abstract_objects_keep_their_references() {
    let compiled = compile(&script(
        "
        abstract material base
        {
            diffuse $colour
        }

        material derived : base
        {
            set $colour red
        }
        ",
    ));
    assert!(compiled.success, "{:?}", compiled.codes());
    assert!(compiled.output[0].contains("diffuse red"));

    let base = compiled.compiler.tree().roots[0];
    let rendered = compiled.compiler.tree().display(base).to_string();
    assert!(rendered.contains("diffuse $colour"), "{rendered}");
}

#[test]
fn expanding_without_references_changes_nothing() {
    let source = script(
        "
        material m
        {
            technique
            {
                pass
                {
                    diffuse 1 0 0
                }
            }
        }
        ",
    );
    let recorder = Recorder::default();
    let mut compiler = ScriptCompiler::new(recorder.clone());
    let mut tree = compiler.build_tree(&parse(&source, "main.material"));
    let before = tree.display_all(&tree.roots);

    let options = CompileOptions {
        imports: false,
        objects: false,
        variables: true,
    };
    assert!(compiler.compile(&mut tree, "General", options));
    assert_eq!(tree.display_all(&tree.roots), before);
    assert!(compiler.compile(&mut tree, "General", options));
    assert_eq!(tree.display_all(&tree.roots), before);
    assert_eq!(recorder.take(), [before.clone(), before]);
}

#[test]
fn statements_headed_by_a_variable_keep_their_values() {
    let compiled = compile(&script(
        "
        set $x ambient

        material m
        {
            $x 1 2 3
        }
        ",
    ));
    assert!(compiled.success, "{:?}", compiled.codes());
    assert_eq!(
        compiled.output,
        [script(
            "
            material m
            {
                $x 1 2 3
            }
            "
        )]
    );
}
