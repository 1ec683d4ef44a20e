use rowan::Language;

/// Unified syntax kind for both tokens and tree nodes.
///
/// Contextual keywords (`var`, `get`, `set`, `nameof`, ...) are lexed as
/// [`SyntaxKind::Identifier`] and recognised by text where the grammar needs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // --- Trivia ---
    Whitespace,
    Newline,
    LineComment,
    BlockComment,
    DocComment,
    Directive,

    // --- Identifiers & literals ---
    Identifier,
    IntLiteral,
    RealLiteral,
    CharLiteral,
    StringLiteral,
    VerbatimStringLiteral,
    /// `$"` or `$@"` / `@$"`.
    InterpolatedStringStart,
    InterpolatedStringText,
    /// Text of an interpolation format clause (`{x:N2}` → `N2`).
    InterpolatedFormatText,
    InterpolatedStringEnd,

    // --- Keywords ---
    AbstractKw,
    AsKw,
    BaseKw,
    BoolKw,
    BreakKw,
    ByteKw,
    CaseKw,
    CatchKw,
    CharKw,
    ClassKw,
    ConstKw,
    ContinueKw,
    DecimalKw,
    DefaultKw,
    DoKw,
    DoubleKw,
    ElseKw,
    EnumKw,
    EventKw,
    ExternKw,
    FalseKw,
    FinallyKw,
    FloatKw,
    ForKw,
    ForeachKw,
    GotoKw,
    IfKw,
    InKw,
    IntKw,
    InterfaceKw,
    InternalKw,
    IsKw,
    LockKw,
    LongKw,
    NamespaceKw,
    NewKw,
    NullKw,
    ObjectKw,
    OutKw,
    OverrideKw,
    ParamsKw,
    PrivateKw,
    ProtectedKw,
    PublicKw,
    ReadonlyKw,
    RefKw,
    ReturnKw,
    SbyteKw,
    SealedKw,
    ShortKw,
    StaticKw,
    StringKw,
    StructKw,
    SwitchKw,
    ThisKw,
    ThrowKw,
    TrueKw,
    TryKw,
    TypeofKw,
    UintKw,
    UlongKw,
    UshortKw,
    UsingKw,
    VirtualKw,
    VoidKw,
    VolatileKw,
    WhileKw,

    // --- Punctuation & operators ---
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Colon,
    Question,
    QuestionQuestion,
    QuestionQuestionEq,
    Arrow,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Bang,
    Tilde,
    Eq,
    Less,
    Greater,
    PlusPlus,
    MinusMinus,
    AmpAmp,
    PipePipe,
    EqEq,
    BangEq,
    LessEq,
    GreaterEq,
    LessLess,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    LessLessEq,

    /// Unrecognised input character(s).
    Unknown,
    Eof,

    // --- Nodes ---
    CompilationUnit,
    /// Root of a fragment parse (see `parse_*_fragment`).
    Fragment,
    Error,

    UsingDirective,
    NamespaceDeclaration,
    QualifiedName,
    AttributeList,
    Modifiers,
    ClassDeclaration,
    StructDeclaration,
    InterfaceDeclaration,
    EnumDeclaration,
    EnumMemberDeclaration,
    TypeParameterList,
    TypeParameter,
    BaseList,

    FieldDeclaration,
    PropertyDeclaration,
    AccessorList,
    AccessorDeclaration,
    MethodDeclaration,
    ConstructorDeclaration,
    ConstructorInitializer,
    ParameterList,
    Parameter,
    ArrowExpressionClause,
    EqualsValueClause,
    VariableDeclaration,
    VariableDeclarator,

    // Types
    PredefinedType,
    NamedType,
    TypeArgumentList,
    ArrayType,
    NullableType,

    // Statements
    Block,
    LocalDeclarationStatement,
    ExpressionStatement,
    IfStatement,
    ElseClause,
    WhileStatement,
    DoStatement,
    ForStatement,
    ForEachStatement,
    ReturnStatement,
    ThrowStatement,
    BreakStatement,
    ContinueStatement,
    EmptyStatement,
    TryStatement,
    CatchClause,
    CatchDeclaration,
    FinallyClause,
    SwitchStatement,
    SwitchSection,
    CaseSwitchLabel,
    DefaultSwitchLabel,

    // Expressions
    LiteralExpression,
    InterpolatedStringExpression,
    Interpolation,
    InterpolationAlignmentClause,
    InterpolationFormatClause,
    NameExpression,
    ThisExpression,
    BaseExpression,
    ParenthesizedExpression,
    MemberAccessExpression,
    InvocationExpression,
    ArgumentList,
    Argument,
    ElementAccessExpression,
    BracketedArgumentList,
    ObjectCreationExpression,
    ArrayCreationExpression,
    InitializerExpression,
    PrefixUnaryExpression,
    PostfixUnaryExpression,
    BinaryExpression,
    AssignmentExpression,
    ConditionalExpression,
    CastExpression,
    TypeOfExpression,
    ThrowExpression,
    LambdaExpression,

    __Last,
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::Whitespace
                | SyntaxKind::Newline
                | SyntaxKind::LineComment
                | SyntaxKind::BlockComment
                | SyntaxKind::DocComment
                | SyntaxKind::Directive
        )
    }

    pub fn is_comment(self) -> bool {
        matches!(
            self,
            SyntaxKind::LineComment | SyntaxKind::BlockComment | SyntaxKind::DocComment
        )
    }

    pub fn is_keyword(self) -> bool {
        (SyntaxKind::AbstractKw as u16..=SyntaxKind::WhileKw as u16).contains(&(self as u16))
    }

    pub fn is_predefined_type(self) -> bool {
        matches!(
            self,
            SyntaxKind::BoolKw
                | SyntaxKind::ByteKw
                | SyntaxKind::CharKw
                | SyntaxKind::DecimalKw
                | SyntaxKind::DoubleKw
                | SyntaxKind::FloatKw
                | SyntaxKind::IntKw
                | SyntaxKind::LongKw
                | SyntaxKind::ObjectKw
                | SyntaxKind::SbyteKw
                | SyntaxKind::ShortKw
                | SyntaxKind::StringKw
                | SyntaxKind::UintKw
                | SyntaxKind::UlongKw
                | SyntaxKind::UshortKw
                | SyntaxKind::VoidKw
        )
    }

    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            SyntaxKind::AbstractKw
                | SyntaxKind::ConstKw
                | SyntaxKind::ExternKw
                | SyntaxKind::InternalKw
                | SyntaxKind::NewKw
                | SyntaxKind::OverrideKw
                | SyntaxKind::PrivateKw
                | SyntaxKind::ProtectedKw
                | SyntaxKind::PublicKw
                | SyntaxKind::ReadonlyKw
                | SyntaxKind::SealedKw
                | SyntaxKind::StaticKw
                | SyntaxKind::VirtualKw
                | SyntaxKind::VolatileKw
        )
    }

    pub fn is_accessibility_modifier(self) -> bool {
        matches!(
            self,
            SyntaxKind::PublicKw
                | SyntaxKind::PrivateKw
                | SyntaxKind::ProtectedKw
                | SyntaxKind::InternalKw
        )
    }

    pub fn is_literal_token(self) -> bool {
        matches!(
            self,
            SyntaxKind::IntLiteral
                | SyntaxKind::RealLiteral
                | SyntaxKind::CharLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::VerbatimStringLiteral
                | SyntaxKind::TrueKw
                | SyntaxKind::FalseKw
                | SyntaxKind::NullKw
                | SyntaxKind::DefaultKw
        )
    }

    pub fn is_compound_assignment_operator(self) -> bool {
        matches!(
            self,
            SyntaxKind::PlusEq
                | SyntaxKind::MinusEq
                | SyntaxKind::StarEq
                | SyntaxKind::SlashEq
                | SyntaxKind::PercentEq
                | SyntaxKind::AmpEq
                | SyntaxKind::PipeEq
                | SyntaxKind::CaretEq
                | SyntaxKind::LessLessEq
                | SyntaxKind::QuestionQuestionEq
        )
    }

    pub fn is_assignment_operator(self) -> bool {
        self == SyntaxKind::Eq || self.is_compound_assignment_operator()
    }

    /// `+=` → `+`, `??=` → `??`.
    pub fn compound_assignment_to_binary(self) -> Option<SyntaxKind> {
        Some(match self {
            SyntaxKind::PlusEq => SyntaxKind::Plus,
            SyntaxKind::MinusEq => SyntaxKind::Minus,
            SyntaxKind::StarEq => SyntaxKind::Star,
            SyntaxKind::SlashEq => SyntaxKind::Slash,
            SyntaxKind::PercentEq => SyntaxKind::Percent,
            SyntaxKind::AmpEq => SyntaxKind::Amp,
            SyntaxKind::PipeEq => SyntaxKind::Pipe,
            SyntaxKind::CaretEq => SyntaxKind::Caret,
            SyntaxKind::LessLessEq => SyntaxKind::LessLess,
            SyntaxKind::QuestionQuestionEq => SyntaxKind::QuestionQuestion,
            _ => return None,
        })
    }

    pub fn binary_to_compound_assignment(self) -> Option<SyntaxKind> {
        Some(match self {
            SyntaxKind::Plus => SyntaxKind::PlusEq,
            SyntaxKind::Minus => SyntaxKind::MinusEq,
            SyntaxKind::Star => SyntaxKind::StarEq,
            SyntaxKind::Slash => SyntaxKind::SlashEq,
            SyntaxKind::Percent => SyntaxKind::PercentEq,
            SyntaxKind::Amp => SyntaxKind::AmpEq,
            SyntaxKind::Pipe => SyntaxKind::PipeEq,
            SyntaxKind::Caret => SyntaxKind::CaretEq,
            SyntaxKind::LessLess => SyntaxKind::LessLessEq,
            SyntaxKind::QuestionQuestion => SyntaxKind::QuestionQuestionEq,
            _ => return None,
        })
    }

    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        Some(match text {
            "abstract" => SyntaxKind::AbstractKw,
            "as" => SyntaxKind::AsKw,
            "base" => SyntaxKind::BaseKw,
            "bool" => SyntaxKind::BoolKw,
            "break" => SyntaxKind::BreakKw,
            "byte" => SyntaxKind::ByteKw,
            "case" => SyntaxKind::CaseKw,
            "catch" => SyntaxKind::CatchKw,
            "char" => SyntaxKind::CharKw,
            "class" => SyntaxKind::ClassKw,
            "const" => SyntaxKind::ConstKw,
            "continue" => SyntaxKind::ContinueKw,
            "decimal" => SyntaxKind::DecimalKw,
            "default" => SyntaxKind::DefaultKw,
            "do" => SyntaxKind::DoKw,
            "double" => SyntaxKind::DoubleKw,
            "else" => SyntaxKind::ElseKw,
            "enum" => SyntaxKind::EnumKw,
            "event" => SyntaxKind::EventKw,
            "extern" => SyntaxKind::ExternKw,
            "false" => SyntaxKind::FalseKw,
            "finally" => SyntaxKind::FinallyKw,
            "float" => SyntaxKind::FloatKw,
            "for" => SyntaxKind::ForKw,
            "foreach" => SyntaxKind::ForeachKw,
            "goto" => SyntaxKind::GotoKw,
            "if" => SyntaxKind::IfKw,
            "in" => SyntaxKind::InKw,
            "int" => SyntaxKind::IntKw,
            "interface" => SyntaxKind::InterfaceKw,
            "internal" => SyntaxKind::InternalKw,
            "is" => SyntaxKind::IsKw,
            "lock" => SyntaxKind::LockKw,
            "long" => SyntaxKind::LongKw,
            "namespace" => SyntaxKind::NamespaceKw,
            "new" => SyntaxKind::NewKw,
            "null" => SyntaxKind::NullKw,
            "object" => SyntaxKind::ObjectKw,
            "out" => SyntaxKind::OutKw,
            "override" => SyntaxKind::OverrideKw,
            "params" => SyntaxKind::ParamsKw,
            "private" => SyntaxKind::PrivateKw,
            "protected" => SyntaxKind::ProtectedKw,
            "public" => SyntaxKind::PublicKw,
            "readonly" => SyntaxKind::ReadonlyKw,
            "ref" => SyntaxKind::RefKw,
            "return" => SyntaxKind::ReturnKw,
            "sbyte" => SyntaxKind::SbyteKw,
            "sealed" => SyntaxKind::SealedKw,
            "short" => SyntaxKind::ShortKw,
            "static" => SyntaxKind::StaticKw,
            "string" => SyntaxKind::StringKw,
            "struct" => SyntaxKind::StructKw,
            "switch" => SyntaxKind::SwitchKw,
            "this" => SyntaxKind::ThisKw,
            "throw" => SyntaxKind::ThrowKw,
            "true" => SyntaxKind::TrueKw,
            "try" => SyntaxKind::TryKw,
            "typeof" => SyntaxKind::TypeofKw,
            "uint" => SyntaxKind::UintKw,
            "ulong" => SyntaxKind::UlongKw,
            "ushort" => SyntaxKind::UshortKw,
            "using" => SyntaxKind::UsingKw,
            "virtual" => SyntaxKind::VirtualKw,
            "void" => SyntaxKind::VoidKw,
            "volatile" => SyntaxKind::VolatileKw,
            "while" => SyntaxKind::WhileKw,
            _ => return None,
        })
    }

    /// Canonical source text of fixed-text tokens (keywords and punctuation).
    pub fn text(self) -> Option<&'static str> {
        use SyntaxKind::*;
        Some(match self {
            AbstractKw => "abstract",
            AsKw => "as",
            BaseKw => "base",
            BoolKw => "bool",
            BreakKw => "break",
            ByteKw => "byte",
            CaseKw => "case",
            CatchKw => "catch",
            CharKw => "char",
            ClassKw => "class",
            ConstKw => "const",
            ContinueKw => "continue",
            DecimalKw => "decimal",
            DefaultKw => "default",
            DoKw => "do",
            DoubleKw => "double",
            ElseKw => "else",
            EnumKw => "enum",
            EventKw => "event",
            ExternKw => "extern",
            FalseKw => "false",
            FinallyKw => "finally",
            FloatKw => "float",
            ForKw => "for",
            ForeachKw => "foreach",
            GotoKw => "goto",
            IfKw => "if",
            InKw => "in",
            IntKw => "int",
            InterfaceKw => "interface",
            InternalKw => "internal",
            IsKw => "is",
            LockKw => "lock",
            LongKw => "long",
            NamespaceKw => "namespace",
            NewKw => "new",
            NullKw => "null",
            ObjectKw => "object",
            OutKw => "out",
            OverrideKw => "override",
            ParamsKw => "params",
            PrivateKw => "private",
            ProtectedKw => "protected",
            PublicKw => "public",
            ReadonlyKw => "readonly",
            RefKw => "ref",
            ReturnKw => "return",
            SbyteKw => "sbyte",
            SealedKw => "sealed",
            ShortKw => "short",
            StaticKw => "static",
            StringKw => "string",
            StructKw => "struct",
            SwitchKw => "switch",
            ThisKw => "this",
            ThrowKw => "throw",
            TrueKw => "true",
            TryKw => "try",
            TypeofKw => "typeof",
            UintKw => "uint",
            UlongKw => "ulong",
            UshortKw => "ushort",
            UsingKw => "using",
            VirtualKw => "virtual",
            VoidKw => "void",
            VolatileKw => "volatile",
            WhileKw => "while",
            LBrace => "{",
            RBrace => "}",
            LParen => "(",
            RParen => ")",
            LBracket => "[",
            RBracket => "]",
            Semicolon => ";",
            Comma => ",",
            Dot => ".",
            Colon => ":",
            Question => "?",
            QuestionQuestion => "??",
            QuestionQuestionEq => "??=",
            Arrow => "=>",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Percent => "%",
            Amp => "&",
            Pipe => "|",
            Caret => "^",
            Bang => "!",
            Tilde => "~",
            Eq => "=",
            Less => "<",
            Greater => ">",
            PlusPlus => "++",
            MinusMinus => "--",
            AmpAmp => "&&",
            PipePipe => "||",
            EqEq => "==",
            BangEq => "!=",
            LessEq => "<=",
            GreaterEq => ">=",
            LessLess => "<<",
            PlusEq => "+=",
            MinusEq => "-=",
            StarEq => "*=",
            SlashEq => "/=",
            PercentEq => "%=",
            AmpEq => "&=",
            PipeEq => "|=",
            CaretEq => "^=",
            LessLessEq => "<<=",
            _ => return None,
        })
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(value: SyntaxKind) -> Self {
        rowan::SyntaxKind(value as u16)
    }
}

/// Rowan language marker for the C# subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CSharpLanguage {}

impl Language for CSharpLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
        if raw.0 < SyntaxKind::__Last as u16 {
            // SAFETY: We've verified the numeric value is within the enum range.
            unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
        } else {
            SyntaxKind::Error
        }
    }

    fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
        kind.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_table_round_trips() {
        for raw in SyntaxKind::AbstractKw as u16..=SyntaxKind::WhileKw as u16 {
            let kind = CSharpLanguage::kind_from_raw(rowan::SyntaxKind(raw));
            let text = kind.text().expect("keyword text");
            assert_eq!(SyntaxKind::from_keyword(text), Some(kind));
            assert!(kind.is_keyword());
        }
    }

    #[test]
    fn compound_operators_pair_up() {
        for op in [SyntaxKind::PlusEq, SyntaxKind::LessLessEq, SyntaxKind::QuestionQuestionEq] {
            let binary = op.compound_assignment_to_binary().unwrap();
            assert_eq!(binary.binary_to_compound_assignment(), Some(op));
        }
    }
}
