//! Inline stylesheet for the console. Purely cosmetic.

pub const STYLESHEET: &str = r#"
.config-console {
    display: flex;
    flex-direction: column;
    height: 100vh;
    font-family: "Roboto", "Helvetica", "Arial", sans-serif;
    background: #f5f5f5;
    color: #212121;
}
.console-header {
    display: flex;
    align-items: center;
    gap: 16px;
    padding: 8px 16px;
    background: #f8fafc;
    border-bottom: 1px solid #e2e8f0;
}
.console-header h1 {
    flex-grow: 1;
    font-size: 1.1rem;
    font-weight: 500;
    margin: 0;
}
.auth-controls {
    display: flex;
    align-items: center;
    gap: 8px;
}
.auth-controls input {
    padding: 8px 10px;
    border-radius: 8px;
    border: 1px solid #e2e8f0;
}
.session-status { color: #757575; font-size: 0.85rem; }
.session-status.authenticated { color: #2e7d32; }
button {
    padding: 8px 16px;
    border-radius: 8px;
    border: 1px solid #e2e8f0;
    background: #ffffff;
    cursor: pointer;
}
button.primary {
    background: #3f51b5;
    border-color: #3f51b5;
    color: #ffffff;
}
button:disabled { opacity: 0.5; cursor: default; }
.icon-btn { display: inline-flex; align-items: center; gap: 4px; }
.console-body { display: flex; flex: 1; overflow: hidden; }
.sidebar {
    width: 300px;
    background: #f8fafc;
    border-right: 1px solid #e2e8f0;
    overflow: auto;
    padding: 8px;
}
.sidebar h2 { font-size: 1rem; font-weight: 500; padding: 8px; margin: 0; }
.sidebar-entry {
    display: block;
    width: 100%;
    text-align: left;
    margin-bottom: 4px;
    border: none;
    background: transparent;
}
.sidebar-entry:hover { background: #eef2f7; }
.sidebar-entry.active { background: #3f51b5; color: #ffffff; }
.editor { flex: 1; overflow: auto; padding: 24px; }
.editor-heading { display: flex; justify-content: space-between; align-items: flex-start; }
.editor-heading h2 { margin: 0 0 8px 0; color: #3f51b5; }
.description { color: #757575; }
.placeholder { text-align: center; color: #757575; margin-top: 48px; }
.save-button { display: inline-flex; align-items: center; gap: 6px; min-width: 130px; }
.value-metadata {
    display: flex;
    gap: 24px;
    margin: 16px 0;
    padding: 12px;
    background: #fafafa;
    border-left: 3px solid #3f51b5;
    border-radius: 4px;
    font-size: 0.9rem;
}
.schema-form { background: #ffffff; border: 1px solid #e2e8f0; border-radius: 8px; padding: 16px; }
.schema-form .form-field { margin-bottom: 16px; display: flex; flex-direction: column; gap: 4px; }
.schema-form label { font-weight: 500; font-size: 0.9rem; }
.schema-form input[type="text"], .schema-form input[type="number"],
.schema-form textarea, .schema-form select {
    padding: 8px 10px;
    border-radius: 8px;
    border: 1px solid #e2e8f0;
    font: inherit;
}
.schema-form fieldset {
    border: 1px solid #e2e8f0;
    border-radius: 8px;
    margin-bottom: 16px;
}
.field-error { color: #c62828; font-size: 0.85rem; }
.field-hint { color: #757575; font-size: 0.8rem; }
.spinner {
    width: 24px;
    height: 24px;
    margin: 24px auto;
    border: 3px solid #e2e8f0;
    border-top-color: #3f51b5;
    border-radius: 50%;
    animation: spin 0.8s linear infinite;
}
@keyframes spin { to { transform: rotate(360deg); } }
.toast {
    position: fixed;
    bottom: 20px;
    right: 20px;
    display: flex;
    align-items: center;
    gap: 12px;
    padding: 10px 20px;
    border-radius: 4px;
    color: #ffffff;
    box-shadow: 0 4px 20px rgba(0,0,0,0.15);
    z-index: 10000;
}
.toast.success { background: #2e7d32; }
.toast.error { background: #c62828; }
.toast .dismiss { background: transparent; border: none; color: inherit; font-size: 1rem; }
"#;
