use super::*;

fn parse(source: &str) -> ParseResult<Program> {
    Parser::new(Lexer::new(source)).parse()
}

fn parse_ok(source: &str) -> Program {
    parse(source).unwrap_or_else(|err| panic!("failed to parse {:?}: {}", source, err))
}

fn body_of(source: &str) -> String {
    let program = parse_ok(source);
    format!("{:?}", program.functions[0])
}

mod expressions {
    use super::*;

    #[test]
    fn multiplication_binds_tighter() {
        assert_eq!(body_of("jugador f():\n    remate 2 pase 3 tiro 4\n"),
                   "jugador f(): { remate (2 pase (3 tiro 4)) }");
    }

    #[test]
    fn arithmetic_is_left_associative() {
        assert_eq!(body_of("jugador f():\n    remate 10 regate 3 regate 2\n"),
                   "jugador f(): { remate ((10 regate 3) regate 2) }");
        assert_eq!(body_of("jugador f():\n    remate 8 intercepcion 4 tiro 2\n"),
                   "jugador f(): { remate ((8 intercepcion 4) tiro 2) }");
    }

    #[test]
    fn parentheses_group() {
        assert_eq!(body_of("jugador f():\n    remate (2 pase 3) tiro 4\n"),
                   "jugador f(): { remate ((2 pase 3) tiro 4) }");
    }

    #[test]
    fn logic_binds_looser_than_comparison() {
        assert_eq!(body_of("jugador f(a):\n    remate a > 1 y a < 5 o a == 9\n"),
                   "jugador f(a): { remate (((a > 1) y (a < 5)) o (a == 9)) }");
    }

    #[test]
    fn literals_and_calls() {
        assert_eq!(body_of("jugador f():\n    golazo.imprimir(\"gol\", 1.5, Verdadero, g())\n"),
                   "jugador f(): { golazo.imprimir(\"gol\", 1.5, Verdadero, g()) }");
    }

    #[test]
    fn comparisons_do_not_chain() {
        let err = parse("jugador f(a):\n    remate 1 < a < 3\n").unwrap_err();

        assert_eq!(err, SyntaxError::UnexpectedToken {
            pos: TokenPos::new(2, 18),
            found: String::from("`<`"),
            message: String::from("Comparisons cannot be chained"),
        });
    }

    #[test]
    fn oversized_integer() {
        let err = parse("jugador f():\n    remate 99999999999999999999\n").unwrap_err();
        assert!(matches!(err, SyntaxError::InvalidNumber { .. }));
    }
}

mod statements {
    use super::*;

    #[test]
    fn program_with_several_functions() {
        let program = parse_ok("\n\njugador doble(n):\n    remate n pase n\n\njugador principal():\n    x = doble(5)\n    remate x\n\n");

        assert_eq!(program.functions.len(), 2);
        assert_eq!(program.functions[0].name.source(), "doble");
        assert_eq!(program.functions[0].params.iter().map(|param| param.source()).collect::<Vec<_>>(), vec!["n"]);
        assert_eq!(format!("{:?}", program.functions[1]), "jugador principal(): { x = doble(5); remate x }");
    }

    #[test]
    fn if_chain() {
        let source = "\
jugador f(a):
    tarjeta (a == 1):
        remate 10
    amonestacion (a == 2):
        remate 20
    amonestacion (a == 3):
        remate 30
    expulsado:
        nada
";
        let program = parse_ok(source);

        match &program.functions[0].body[..] {
            [Stmt::If { then, branches, .. }] => {
                assert_eq!(then.len(), 1);
                assert_eq!(branches.len(), 3);
                assert!(matches!(branches[0], Branch::Elif { .. }));
                assert!(matches!(branches[1], Branch::Elif { .. }));
                assert!(matches!(branches[2], Branch::Else { .. }));
                assert_eq!(branches[2].body(), &[Stmt::Nop]);
            },
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn blocks_absorb_following_statements() {
        let source = "\
jugador f():
    tarjeta (1 == 1):
        x = 1
    y_final = 2
";
        assert_eq!(body_of(source), "jugador f(): { tarjeta ((1 == 1)) { x = 1; y_final = 2 } }");
    }

    #[test]
    fn branches_attach_to_the_innermost_tarjeta() {
        let source = "\
jugador f():
    tarjeta (Falso):
        tarjeta (Verdadero):
            remate 1
    amonestacion (Verdadero):
        remate 2
    remate 3
";
        let program = parse_ok(source);

        match &program.functions[0].body[..] {
            [Stmt::If { then, branches: outer, .. }] => {
                assert!(outer.is_empty());

                match &then[..] {
                    [Stmt::If { branches: inner, .. }] => {
                        assert_eq!(inner.len(), 1);
                        assert!(matches!(inner[0], Branch::Elif { .. }));
                        assert_eq!(inner[0].body().len(), 2);
                    },
                    other => panic!("unexpected block {:?}", other),
                }
            },
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn for_loop() {
        assert_eq!(body_of("jugador f():\n    delantero i en rango(3):\n        golazo.imprimir(i)\n"),
                   "jugador f(): { delantero i en rango(3) { golazo.imprimir(i) } }");
    }

    #[test]
    fn else_must_be_last() {
        let source = "\
jugador f(a):
    tarjeta (a):
        remate 1
    expulsado:
        remate 2
    amonestacion (a):
        remate 3
";
        let err = parse(source).unwrap_err();
        assert!(matches!(err, SyntaxError::UnexpectedToken { ref found, .. } if found == "`amonestacion`"), "{:?}", err);
    }

    #[test]
    fn missing_colon() {
        let err = parse("jugador f()\n    remate 1\n").unwrap_err();

        assert_eq!(err, SyntaxError::UnexpectedToken {
            pos: TokenPos::new(1, 12),
            found: String::from("newline"),
            message: String::from("Expected ':' after function header"),
        });
    }

    #[test]
    fn trailing_garbage_on_a_line() {
        let err = parse("jugador f():\n    remate a b\n").unwrap_err();
        assert!(matches!(err, SyntaxError::UnexpectedToken { ref found, .. } if found == "`b`"), "{:?}", err);
    }

    #[test]
    fn empty_input() {
        assert!(matches!(parse("\n\n").unwrap_err(), SyntaxError::UnexpectedEof { .. }));
        assert!(matches!(parse("jugador f():\n").unwrap_err(), SyntaxError::UnexpectedEof { .. }));
    }

    #[test]
    fn duplicate_parameters() {
        let err = parse("jugador f(a, a):\n    remate a\n").unwrap_err();
        assert_eq!(err, SyntaxError::DuplicateParameter { pos: TokenPos::new(1, 14), name: String::from("a") });
    }

    #[test]
    fn lexer_errors_are_collected() {
        let mut parser = Parser::new(Lexer::new("jugador f():\n    remate 1 $ pase 2\n"));
        let program = parser.parse().unwrap();

        assert_eq!(format!("{:?}", program.functions[0]), "jugador f(): { remate (1 pase 2) }");
        assert_eq!(parser.lexer_errors(), &[LexerError::IllegalCharacter { pos: TokenPos::new(2, 14), character: '$' }]);
    }
}
