// Texts shown to chat users

pub const GREETING: &str = "Привет! Я нормоконтролёр для проверки технических заданий. \
    Отправьте текст ТЗ или прикрепите файл (PDF, TXT).";

pub const CHECKING: &str = "Проверяю ваше техническое задание...";

pub const FILE_ERROR: &str =
    "Ошибка при обработке файла. Попробуйте отправить другой файл (PDF или TXT).";

pub const ANALYSIS_FILE_NAME: &str = "analysis.pdf";

pub fn file_too_large(max_file_size: u64) -> String {
    format!(
        "Файл слишком большой. Максимальный размер: {} МБ.",
        max_file_size / (1024 * 1024)
    )
}

pub fn sending_as_file(chars: usize) -> String {
    format!(
        "Ответ слишком длинный ({} символов), отправляю в виде файла.",
        chars
    )
}
