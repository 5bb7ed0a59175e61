use std::collections::HashMap;

const FALLBACK_LANG: &str = "en-US";

// Simple in-memory translations
#[derive(Default)]
pub struct Translations {
    strings: HashMap<&'static str, &'static str>,
}

impl Translations {
    fn from_pairs(pairs: &[(&'static str, &'static str)]) -> Self {
        Self {
            strings: pairs.iter().copied().collect(),
        }
    }

    pub fn lookup(&self, key: &str) -> Option<&'static str> {
        self.strings.get(key).copied()
    }
}

const EN: &[(&str, &str)] = &[
    ("app-title", "SpotDL - Customizable Spotify Downloads"),
    ("url-label", "Spotify URL:"),
    ("url-placeholder", "https://open.spotify.com/..."),
    ("paste-button", "Paste URL"),
    ("format-label", "Output format:"),
    ("bitrate-label", "Bitrate:"),
    ("provider-label", "Audio provider:"),
    ("choose-folder-button", "Choose download folder"),
    ("folder-label", "Download folder:"),
    ("download-button", "Start download"),
    ("save-button", "Save settings"),
    ("status-label", "Status:"),
    ("status-waiting", "Waiting for URL"),
    ("status-starting", "Starting download..."),
    ("status-completed", "Download completed."),
    ("status-companion-missing", "Error - companion not found."),
    ("status-failed", "Download error."),
    ("title-error", "Error"),
    ("title-success", "Success"),
    ("title-open-folder", "Open folder"),
    ("error-empty-url", "Please enter a valid URL."),
    ("error-busy", "A download is already running."),
    ("error-unsupported-format", "Unsupported output format:"),
    ("error-unsupported-bitrate", "Unsupported bitrate:"),
    ("error-companion-missing", "The spotdl executable was not found at:"),
    ("error-download-failed", "Download error:"),
    ("error-open-folder", "Could not open the download folder:"),
    ("error-clipboard", "Could not read the clipboard:"),
    ("error-settings-load", "Could not load the settings, using defaults:"),
    ("error-settings-save", "Could not save the settings:"),
    ("settings-saved", "Settings saved."),
    ("download-complete", "Download completed."),
    ("open-folder-question", "Do you want to open the download folder?"),
    ("yes-button", "Yes"),
    ("no-button", "No"),
    ("ok-button", "OK"),
];

const ES: &[(&str, &str)] = &[
    ("app-title", "SpotDL - Descarga Personalizable de Spotify"),
    ("url-label", "URL de Spotify:"),
    ("url-placeholder", "https://open.spotify.com/..."),
    ("paste-button", "Pegar URL"),
    ("format-label", "Formato de salida:"),
    ("bitrate-label", "Bitrate:"),
    ("provider-label", "Proveedor de audio:"),
    ("choose-folder-button", "Seleccionar carpeta de descargas"),
    ("folder-label", "Carpeta de descargas:"),
    ("download-button", "Iniciar descarga"),
    ("save-button", "Guardar configuración"),
    ("status-label", "Estado:"),
    ("status-waiting", "Esperando URL"),
    ("status-starting", "Iniciando descarga..."),
    ("status-completed", "Descarga completada."),
    ("status-companion-missing", "Error - Archivo no encontrado."),
    ("status-failed", "Error en la descarga."),
    ("title-error", "Error"),
    ("title-success", "Éxito"),
    ("title-open-folder", "Abrir carpeta"),
    ("error-empty-url", "Por favor, ingrese una URL válida."),
    ("error-busy", "Ya hay una descarga en curso."),
    ("error-unsupported-format", "Formato de salida no soportado:"),
    ("error-unsupported-bitrate", "Bitrate no soportado:"),
    ("error-companion-missing", "No se encontró el ejecutable spotdl en:"),
    ("error-download-failed", "Error en la descarga:"),
    ("error-open-folder", "Error al abrir la carpeta de descargas:"),
    ("error-clipboard", "No se pudo leer el portapapeles:"),
    ("error-settings-load", "No se pudo cargar la configuración, se usan los valores predeterminados:"),
    ("error-settings-save", "No se pudo guardar la configuración:"),
    ("settings-saved", "Configuración guardada correctamente."),
    ("download-complete", "Descarga completada."),
    ("open-folder-question", "¿Deseas abrir la carpeta de descargas?"),
    ("yes-button", "Sí"),
    ("no-button", "No"),
    ("ok-button", "Aceptar"),
];

pub struct Localizations {
    translations: HashMap<&'static str, Translations>,
    current_lang: &'static str,
}

impl Default for Localizations {
    fn default() -> Self {
        Self::new()
    }
}

impl Localizations {
    /// Picks Spanish when `LANG` starts with `es`, English otherwise.
    pub fn new() -> Self {
        let lang = std::env::var("LANG").unwrap_or_default();
        Self::for_language(&lang)
    }

    pub fn for_language(lang: &str) -> Self {
        let mut translations = HashMap::new();
        translations.insert("en-US", Translations::from_pairs(EN));
        translations.insert("es-ES", Translations::from_pairs(ES));

        let current_lang = if lang.to_lowercase().starts_with("es") {
            "es-ES"
        } else {
            FALLBACK_LANG
        };

        Self {
            translations,
            current_lang,
        }
    }

    pub fn language(&self) -> &str {
        self.current_lang
    }

    /// Looks `key` up in the current language, then English, then returns the
    /// key itself.
    pub fn tr(&self, key: &str) -> String {
        [self.current_lang, FALLBACK_LANG]
            .iter()
            .find_map(|lang| self.translations.get(lang).and_then(|t| t.lookup(key)))
            .unwrap_or(key)
            .to_string()
    }

    /// `"<label> <detail>"`, for messages that carry a path or diagnostic.
    pub fn tr_with(&self, key: &str, detail: impl std::fmt::Display) -> String {
        format!("{} {}", self.tr(key), detail)
    }
}
