/// All localized user-facing strings for a locale.
///
/// The field set IS the closed localization key set: a missing translation is
/// a compile error, not a runtime lookup failure. Strings are plain text;
/// the outbound channel delivers them verbatim.
#[derive(Debug, Clone)]
pub struct LocaleStrings {
    // ==================== Main Menu ====================
    /// Greeting shown above the menu on the first turn of a conversation
    pub welcome: &'static str,

    /// Prompt shown above the menu after a sub-flow completes
    pub new_question: &'static str,

    /// Display string for the Get-Answers menu choice
    pub get_answers: &'static str,

    /// Display string for the Select-Language menu choice
    pub set_language: &'static str,

    /// SMS-variant Get-Answers choice (carries the "1" reply shortcut)
    pub sms_get_answers: &'static str,

    /// SMS-variant Select-Language choice (carries the "2" reply shortcut)
    pub sms_set_language: &'static str,

    // ==================== Q&A Sub-flow ====================
    /// Prompt asking the user to type their question
    pub ask_question: &'static str,

    /// Reply when the knowledge base has no answer for the question
    pub no_answer_found: &'static str,

    // ==================== Language-Change Sub-flow ====================
    /// Prompt shown above the numbered locale list
    pub choose_language: &'static str,

    /// Confirmation shown (in the NEW locale) after a language change
    pub language_changed: &'static str,

    // ==================== Failure Notices ====================
    /// Generic notice when language detection fails (shown in English only)
    pub detection_failed: &'static str,

    /// Instructional notice when capability settings are missing
    /// (shown in English only)
    pub setup_missing: &'static str,

    // ==================== Welcome Card ====================
    /// Title of the one-time welcome card (rendered in English only)
    pub welcome_title: &'static str,

    /// Image URL of the one-time welcome card
    pub welcome_image_url: &'static str,
}

// ==================== English Strings ====================

/// English strings (default locale)
pub const ENGLISH_STRINGS: LocaleStrings = LocaleStrings {
    welcome: "Welcome! How can I help you today?",
    new_question: "Do you have another question?",
    get_answers: "Get Answers",
    set_language: "Select Language",
    sms_get_answers: "1 - Get Answers",
    sms_set_language: "2 - Select Language",

    ask_question: "What is your question?",
    no_answer_found:
        "I could not find an answer to your question. Please try again or contact the helpline.",

    choose_language: "Please choose your language:",
    language_changed: "Language updated. We will continue in English.",

    detection_failed:
        "Sorry, something went wrong while detecting your language. Please try again.",
    setup_missing: "Please set DETECTION_ENDPOINT, DETECTION_API_KEY, QNA_ENDPOINT, QNA_API_KEY, \
and QNA_KB_ID before using the bot.",

    welcome_title: "Helpline Assistant",
    welcome_image_url: "https://helpline.example.org/assets/welcome-card.png",
};

// ==================== Spanish Strings ====================

/// Spanish strings
pub const SPANISH_STRINGS: LocaleStrings = LocaleStrings {
    welcome: "¡Bienvenido! ¿Cómo puedo ayudarle hoy?",
    new_question: "¿Tiene otra pregunta?",
    get_answers: "Obtener Respuestas",
    set_language: "Seleccione el idioma",
    sms_get_answers: "1 - Obtener Respuestas",
    sms_set_language: "2 - Seleccione el idioma",

    ask_question: "¿Cuál es su pregunta?",
    no_answer_found: "No pude encontrar una respuesta a su pregunta. Inténtelo de nuevo o \
comuníquese con la línea de ayuda.",

    choose_language: "Por favor seleccione su idioma:",
    language_changed: "Idioma actualizado. Continuaremos en español.",

    detection_failed:
        "Lo sentimos, ocurrió un error al detectar su idioma. Inténtelo de nuevo.",
    setup_missing: "Configure DETECTION_ENDPOINT, DETECTION_API_KEY, QNA_ENDPOINT, QNA_API_KEY \
y QNA_KB_ID antes de usar el bot.",

    welcome_title: "Asistente de la Línea de Ayuda",
    welcome_image_url: "https://helpline.example.org/assets/welcome-card.png",
};

// ==================== Chinese Strings ====================

/// Chinese (Simplified) strings
pub const CHINESE_STRINGS: LocaleStrings = LocaleStrings {
    welcome: "欢迎！今天我能为您做什么？",
    new_question: "您还有其他问题吗？",
    get_answers: "其他问题",
    set_language: "选择语言",
    sms_get_answers: "1 - 其他问题",
    sms_set_language: "2 - 选择语言",

    ask_question: "请问您的问题是什么？",
    no_answer_found: "我找不到您问题的答案。请重试或联系服务热线。",

    choose_language: "请选择您的语言：",
    language_changed: "语言已更新。我们将继续使用中文。",

    detection_failed: "抱歉，检测您的语言时出现问题。请重试。",
    setup_missing: "使用机器人之前，请设置 DETECTION_ENDPOINT、DETECTION_API_KEY、QNA_ENDPOINT、\
QNA_API_KEY 和 QNA_KB_ID。",

    welcome_title: "服务热线助手",
    welcome_image_url: "https://helpline.example.org/assets/welcome-card.png",
};

// ==================== French Strings ====================

/// French strings
pub const FRENCH_STRINGS: LocaleStrings = LocaleStrings {
    welcome: "Bienvenue ! Comment puis-je vous aider aujourd'hui ?",
    new_question: "Avez-vous une autre question ?",
    get_answers: "Obtenir les réponses",
    set_language: "Sélectionner la langue",
    sms_get_answers: "1 - Obtenir les réponses",
    sms_set_language: "2 - Sélectionner la langue",

    ask_question: "Quelle est votre question ?",
    no_answer_found: "Je n'ai pas trouvé de réponse à votre question. Veuillez réessayer ou \
contacter la ligne d'assistance.",

    choose_language: "Veuillez choisir votre langue :",
    language_changed: "Langue mise à jour. Nous continuerons en français.",

    detection_failed:
        "Désolé, une erreur s'est produite lors de la détection de votre langue. Veuillez réessayer.",
    setup_missing: "Veuillez définir DETECTION_ENDPOINT, DETECTION_API_KEY, QNA_ENDPOINT, \
QNA_API_KEY et QNA_KB_ID avant d'utiliser le bot.",

    welcome_title: "Assistant de la ligne d'assistance",
    welcome_image_url: "https://helpline.example.org/assets/welcome-card.png",
};
