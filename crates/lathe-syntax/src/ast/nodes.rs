use crate::ast::{support, AstNode};
use crate::parser::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

macro_rules! ast_node {
    ($($(#[$attr:meta])* $name:ident),* $(,)?) => {$(
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            syntax: SyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$name
            }

            fn cast(syntax: SyntaxNode) -> Option<Self> {
                Self::can_cast(syntax.kind()).then_some(Self { syntax })
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }
    )*};
}

macro_rules! ast_enum {
    ($(#[$attr:meta])* $name:ident { $($variant:ident),* $(,)? }) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant($variant),)*
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                matches!(kind, $(SyntaxKind::$variant)|*)
            }

            fn cast(syntax: SyntaxNode) -> Option<Self> {
                Some(match syntax.kind() {
                    $(SyntaxKind::$variant => $name::$variant($variant { syntax }),)*
                    _ => return None,
                })
            }

            fn syntax(&self) -> &SyntaxNode {
                match self {
                    $($name::$variant(it) => it.syntax(),)*
                }
            }
        }

        $(
            impl From<$variant> for $name {
                fn from(node: $variant) -> Self {
                    $name::$variant(node)
                }
            }
        )*
    };
}

ast_node!(
    CompilationUnit,
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
    PredefinedType,
    NamedType,
    TypeArgumentList,
    ArrayType,
    NullableType,
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
);

ast_enum!(
    Expr {
        LiteralExpression,
        InterpolatedStringExpression,
        NameExpression,
        ThisExpression,
        BaseExpression,
        ParenthesizedExpression,
        MemberAccessExpression,
        InvocationExpression,
        ElementAccessExpression,
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
    }
);

ast_enum!(
    Stmt {
        Block,
        LocalDeclarationStatement,
        ExpressionStatement,
        IfStatement,
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
        SwitchStatement,
    }
);

ast_enum!(
    /// Declarations that may appear in a type body (or, for types, a namespace).
    Member {
        FieldDeclaration,
        PropertyDeclaration,
        MethodDeclaration,
        ConstructorDeclaration,
        ClassDeclaration,
        StructDeclaration,
        InterfaceDeclaration,
        EnumDeclaration,
    }
);

ast_enum!(
    /// Type declarations with a member list.
    TypeDeclaration {
        ClassDeclaration,
        StructDeclaration,
        InterfaceDeclaration,
    }
);

ast_enum!(
    Type {
        PredefinedType,
        NamedType,
        ArrayType,
        NullableType,
    }
);

ast_enum!(
    SwitchLabel {
        CaseSwitchLabel,
        DefaultSwitchLabel,
    }
);

// --- Declarations ------------------------------------------------------

impl CompilationUnit {
    pub fn usings(&self) -> impl Iterator<Item = UsingDirective> + '_ {
        support::children(&self.syntax)
    }

    pub fn namespaces(&self) -> impl Iterator<Item = NamespaceDeclaration> + '_ {
        support::children(&self.syntax)
    }

    pub fn members(&self) -> impl Iterator<Item = Member> + '_ {
        support::children(&self.syntax)
    }
}

impl NamespaceDeclaration {
    pub fn name(&self) -> Option<QualifiedName> {
        support::child(&self.syntax)
    }

    pub fn members(&self) -> impl Iterator<Item = Member> + '_ {
        support::children(&self.syntax)
    }
}

impl Modifiers {
    pub fn tokens(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| !t.kind().is_trivia())
    }

    pub fn has(&self, kind: SyntaxKind) -> bool {
        self.tokens().any(|t| t.kind() == kind)
    }
}

impl EnumDeclaration {
    pub fn members(&self) -> impl Iterator<Item = EnumMemberDeclaration> + '_ {
        support::children(&self.syntax)
    }

    pub fn l_brace_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::LBrace)
    }

    pub fn r_brace_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::RBrace)
    }
}

impl EnumMemberDeclaration {
    pub fn equals_value(&self) -> Option<EqualsValueClause> {
        support::child(&self.syntax)
    }

    pub fn value(&self) -> Option<Expr> {
        self.equals_value()?.value()
    }
}

impl FieldDeclaration {
    pub fn declaration(&self) -> Option<VariableDeclaration> {
        support::child(&self.syntax)
    }

    pub fn semicolon_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::Semicolon)
    }
}

impl PropertyDeclaration {
    pub fn ty(&self) -> Option<Type> {
        support::child(&self.syntax)
    }

    pub fn accessor_list(&self) -> Option<AccessorList> {
        support::child(&self.syntax)
    }

    pub fn expression_body(&self) -> Option<ArrowExpressionClause> {
        support::child(&self.syntax)
    }

    pub fn initializer(&self) -> Option<EqualsValueClause> {
        support::child(&self.syntax)
    }

    pub fn semicolon_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::Semicolon)
    }
}

impl AccessorList {
    pub fn accessors(&self) -> impl Iterator<Item = AccessorDeclaration> + '_ {
        support::children(&self.syntax)
    }
}

impl AccessorDeclaration {
    /// The `get`, `set` or `init` keyword.
    pub fn keyword_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::Identifier)
    }

    pub fn is_getter(&self) -> bool {
        self.keyword_token().map_or(false, |t| t.text() == "get")
    }

    pub fn is_setter(&self) -> bool {
        self.keyword_token()
            .map_or(false, |t| t.text() == "set" || t.text() == "init")
    }
}

impl MethodDeclaration {
    pub fn return_type(&self) -> Option<Type> {
        support::child(&self.syntax)
    }

    pub fn parameter_list(&self) -> Option<ParameterList> {
        support::child(&self.syntax)
    }

    pub fn returns_void(&self) -> bool {
        matches!(self.return_type(), Some(Type::PredefinedType(ty)) if ty.keyword_kind() == Some(SyntaxKind::VoidKw))
    }
}

impl ConstructorDeclaration {
    pub fn parameter_list(&self) -> Option<ParameterList> {
        support::child(&self.syntax)
    }

    pub fn initializer(&self) -> Option<ConstructorInitializer> {
        support::child(&self.syntax)
    }
}

impl ParameterList {
    pub fn parameters(&self) -> impl Iterator<Item = Parameter> + '_ {
        support::children(&self.syntax)
    }
}

impl Parameter {
    pub fn ty(&self) -> Option<Type> {
        support::child(&self.syntax)
    }

    pub fn default_value(&self) -> Option<EqualsValueClause> {
        support::child(&self.syntax)
    }

    pub fn has_modifier(&self, kind: SyntaxKind) -> bool {
        support::token(&self.syntax, kind).is_some()
    }
}

impl ArrowExpressionClause {
    pub fn arrow_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::Arrow)
    }

    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl EqualsValueClause {
    pub fn value(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl VariableDeclaration {
    pub fn ty(&self) -> Option<Type> {
        support::child(&self.syntax)
    }

    pub fn declarators(&self) -> impl Iterator<Item = VariableDeclarator> + '_ {
        support::children(&self.syntax)
    }
}

impl VariableDeclarator {
    pub fn initializer(&self) -> Option<EqualsValueClause> {
        support::child(&self.syntax)
    }

    pub fn value(&self) -> Option<Expr> {
        self.initializer()?.value()
    }
}

// --- Types -------------------------------------------------------------

impl PredefinedType {
    pub fn keyword_kind(&self) -> Option<SyntaxKind> {
        support::first_token(&self.syntax).map(|t| t.kind())
    }
}

impl NamedType {
    pub fn type_arguments(&self) -> Option<TypeArgumentList> {
        support::child(&self.syntax)
    }

    /// Identifier segments, e.g. `System`, `Collections`, `List`.
    pub fn segments(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        support::tokens(&self.syntax, SyntaxKind::Identifier)
    }

    /// Last identifier segment.
    pub fn simple_name(&self) -> Option<SyntaxToken> {
        self.segments().last()
    }

    pub fn is_var(&self) -> bool {
        self.type_arguments().is_none()
            && self.segments().count() == 1
            && self.simple_name().map_or(false, |t| t.text() == "var")
    }
}

impl TypeArgumentList {
    pub fn types(&self) -> impl Iterator<Item = Type> + '_ {
        support::children(&self.syntax)
    }
}

impl ArrayType {
    pub fn element_type(&self) -> Option<Type> {
        support::child(&self.syntax)
    }
}

impl NullableType {
    pub fn underlying_type(&self) -> Option<Type> {
        support::child(&self.syntax)
    }
}

// --- Statements --------------------------------------------------------

impl Block {
    pub fn statements(&self) -> impl Iterator<Item = Stmt> + '_ {
        support::children(&self.syntax)
    }

    pub fn l_brace_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::LBrace)
    }

    pub fn r_brace_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::RBrace)
    }
}

impl LocalDeclarationStatement {
    pub fn declaration(&self) -> Option<VariableDeclaration> {
        support::child(&self.syntax)
    }

    pub fn is_const(&self) -> bool {
        support::token(&self.syntax, SyntaxKind::ConstKw).is_some()
    }

    pub fn semicolon_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::Semicolon)
    }
}

impl ExpressionStatement {
    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }

    pub fn semicolon_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::Semicolon)
    }
}

impl IfStatement {
    pub fn if_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::IfKw)
    }

    pub fn condition(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }

    pub fn statement(&self) -> Option<Stmt> {
        support::child(&self.syntax)
    }

    pub fn else_clause(&self) -> Option<ElseClause> {
        support::child(&self.syntax)
    }

    pub fn r_paren_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::RParen)
    }
}

impl ElseClause {
    pub fn else_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::ElseKw)
    }

    pub fn statement(&self) -> Option<Stmt> {
        support::child(&self.syntax)
    }
}

impl WhileStatement {
    pub fn while_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::WhileKw)
    }

    pub fn condition(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }

    pub fn statement(&self) -> Option<Stmt> {
        support::child(&self.syntax)
    }

    pub fn r_paren_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::RParen)
    }
}

impl DoStatement {
    pub fn do_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::DoKw)
    }

    pub fn statement(&self) -> Option<Stmt> {
        support::child(&self.syntax)
    }

    pub fn while_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::WhileKw)
    }

    pub fn condition(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl ForStatement {
    pub fn for_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::ForKw)
    }

    pub fn declaration(&self) -> Option<VariableDeclaration> {
        support::child(&self.syntax)
    }

    /// Expressions in the three header sections, split at the header's `;` tokens.
    fn sections(&self) -> [Vec<Expr>; 3] {
        let mut sections: [Vec<Expr>; 3] = Default::default();
        let mut idx = 0;
        for element in self.syntax.children_with_tokens() {
            match element {
                rowan::NodeOrToken::Token(tok) if tok.kind() == SyntaxKind::Semicolon => {
                    idx = (idx + 1).min(2);
                }
                rowan::NodeOrToken::Token(tok) if tok.kind() == SyntaxKind::RParen => break,
                rowan::NodeOrToken::Node(node) => {
                    if let Some(expr) = Expr::cast(node) {
                        sections[idx].push(expr);
                    }
                }
                _ => {}
            }
        }
        sections
    }

    pub fn initializers(&self) -> Vec<Expr> {
        let [initializers, _, _] = self.sections();
        initializers
    }

    pub fn condition(&self) -> Option<Expr> {
        let [_, condition, _] = self.sections();
        condition.into_iter().next()
    }

    pub fn incrementors(&self) -> Vec<Expr> {
        let [_, _, incrementors] = self.sections();
        incrementors
    }

    pub fn statement(&self) -> Option<Stmt> {
        support::child(&self.syntax)
    }
}

impl ForEachStatement {
    pub fn ty(&self) -> Option<Type> {
        support::child(&self.syntax)
    }

    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }

    pub fn statement(&self) -> Option<Stmt> {
        support::child(&self.syntax)
    }
}

impl ReturnStatement {
    pub fn return_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::ReturnKw)
    }

    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl ThrowStatement {
    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl TryStatement {
    pub fn block(&self) -> Option<Block> {
        support::child(&self.syntax)
    }

    pub fn catch_clauses(&self) -> impl Iterator<Item = CatchClause> + '_ {
        support::children(&self.syntax)
    }

    pub fn finally_clause(&self) -> Option<FinallyClause> {
        support::child(&self.syntax)
    }
}

impl SwitchStatement {
    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }

    pub fn sections(&self) -> impl Iterator<Item = SwitchSection> + '_ {
        support::children(&self.syntax)
    }
}

impl SwitchSection {
    pub fn labels(&self) -> impl Iterator<Item = SwitchLabel> + '_ {
        support::children(&self.syntax)
    }

    pub fn statements(&self) -> impl Iterator<Item = Stmt> + '_ {
        support::children(&self.syntax)
    }
}

impl CaseSwitchLabel {
    pub fn value(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

// --- Expressions -------------------------------------------------------

impl LiteralExpression {
    pub fn token(&self) -> Option<SyntaxToken> {
        support::first_token(&self.syntax)
    }

    pub fn kind(&self) -> Option<SyntaxKind> {
        self.token().map(|t| t.kind())
    }
}

impl InterpolatedStringExpression {
    pub fn start_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::InterpolatedStringStart)
    }

    pub fn end_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::InterpolatedStringEnd)
    }

    pub fn is_verbatim(&self) -> bool {
        self.start_token().map_or(false, |t| t.text().contains('@'))
    }

    pub fn interpolations(&self) -> impl Iterator<Item = Interpolation> + '_ {
        support::children(&self.syntax)
    }
}

impl Interpolation {
    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }

    pub fn alignment(&self) -> Option<InterpolationAlignmentClause> {
        support::child(&self.syntax)
    }

    pub fn format(&self) -> Option<InterpolationFormatClause> {
        support::child(&self.syntax)
    }
}

impl NameExpression {
    /// Identifier, or the keyword of a predefined type used as an expression (`string.Empty`).
    pub fn token(&self) -> Option<SyntaxToken> {
        support::first_token(&self.syntax)
    }

    pub fn name(&self) -> Option<String> {
        self.token().map(|t| t.text().to_string())
    }
}

impl ParenthesizedExpression {
    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl MemberAccessExpression {
    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }

    pub fn name_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::Identifier)
    }
}

impl InvocationExpression {
    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }

    pub fn argument_list(&self) -> Option<ArgumentList> {
        support::child(&self.syntax)
    }
}

impl ArgumentList {
    pub fn arguments(&self) -> impl Iterator<Item = Argument> + '_ {
        support::children(&self.syntax)
    }
}

impl Argument {
    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl ElementAccessExpression {
    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl ObjectCreationExpression {
    pub fn ty(&self) -> Option<Type> {
        support::child(&self.syntax)
    }

    pub fn argument_list(&self) -> Option<ArgumentList> {
        support::child(&self.syntax)
    }

    pub fn initializer(&self) -> Option<InitializerExpression> {
        support::child(&self.syntax)
    }
}

impl ArrayCreationExpression {
    pub fn ty(&self) -> Option<Type> {
        support::child(&self.syntax)
    }
}

impl InitializerExpression {
    pub fn elements(&self) -> impl Iterator<Item = Expr> + '_ {
        support::children(&self.syntax)
    }
}

impl PrefixUnaryExpression {
    pub fn op_token(&self) -> Option<SyntaxToken> {
        support::first_token(&self.syntax)
    }

    pub fn op_kind(&self) -> Option<SyntaxKind> {
        self.op_token().map(|t| t.kind())
    }

    pub fn operand(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl PostfixUnaryExpression {
    pub fn operand(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }

    pub fn op_kind(&self) -> Option<SyntaxKind> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| !t.kind().is_trivia())
            .last()
            .map(|t| t.kind())
    }
}

impl BinaryExpression {
    pub fn lhs(&self) -> Option<Expr> {
        support::nth_child(&self.syntax, 0)
    }

    /// Right operand; `None` for `is`/`as` with a type on the right.
    pub fn rhs(&self) -> Option<Expr> {
        support::nth_child(&self.syntax, 1)
    }

    pub fn rhs_type(&self) -> Option<Type> {
        support::child(&self.syntax)
    }

    pub fn op_token(&self) -> Option<SyntaxToken> {
        support::first_token(&self.syntax)
    }

    /// Operator kind; `>>` (two adjacent `>` tokens) is reported as `Greater` twice,
    /// see [`BinaryExpression::is_shift_right`].
    pub fn op_kind(&self) -> Option<SyntaxKind> {
        self.op_token().map(|t| t.kind())
    }

    pub fn is_shift_right(&self) -> bool {
        support::tokens(&self.syntax, SyntaxKind::Greater).count() == 2
    }
}

impl AssignmentExpression {
    pub fn lhs(&self) -> Option<Expr> {
        support::nth_child(&self.syntax, 0)
    }

    pub fn rhs(&self) -> Option<Expr> {
        support::nth_child(&self.syntax, 1)
    }

    pub fn op_token(&self) -> Option<SyntaxToken> {
        support::first_token(&self.syntax)
    }

    pub fn op_kind(&self) -> Option<SyntaxKind> {
        self.op_token().map(|t| t.kind())
    }
}

impl ConditionalExpression {
    pub fn condition(&self) -> Option<Expr> {
        support::nth_child(&self.syntax, 0)
    }

    pub fn when_true(&self) -> Option<Expr> {
        support::nth_child(&self.syntax, 1)
    }

    pub fn when_false(&self) -> Option<Expr> {
        support::nth_child(&self.syntax, 2)
    }

    pub fn question_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::Question)
    }

    pub fn colon_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::Colon)
    }
}

impl CastExpression {
    pub fn ty(&self) -> Option<Type> {
        support::child(&self.syntax)
    }

    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl ThrowExpression {
    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl LambdaExpression {
    pub fn body(&self) -> Option<SyntaxNode> {
        self.syntax
            .children()
            .filter(|n| n.kind() != SyntaxKind::Parameter && n.kind() != SyntaxKind::ParameterList)
            .last()
    }
}
