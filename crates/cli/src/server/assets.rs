/// HTML shell served at `/`. It loads the launch constants, mounts the
/// element UI entry when one exists, and reloads on file changes.
pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Element Dev Server</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body { font-family: system-ui, sans-serif; background: #0f0f14; color: #e6e6e6; }
        header { padding: 12px 20px; border-bottom: 1px solid #8759F2; display: flex; gap: 24px; }
        header span { color: #01D4E7; }
        #root { padding: 20px; }
        #status.error { color: #f44; }
    </style>
</head>
<body>
    <header>
        <div>Element: <span id="element-name">...</span></div>
        <div>Action/Signal: <span id="unit-key">...</span></div>
        <div>Property: <span id="property-key">-</span></div>
    </header>
    <div id="root"><p id="status">Loading element...</p></div>
    <script type="module">
        import env from '/__element/env.js';
        window.__ELEMENT_ENV__ = env;

        const text = (id, value) => { document.getElementById(id).textContent = value ?? '-'; };
        text('element-name', env.ELEMENT_NAME);
        text('unit-key', env.ACTION_SIGNAL_KEY);
        text('property-key', env.PROPERTY_KEY);

        const status = document.getElementById('status');
        try {
            const context = await fetch('/__element/context').then((r) => r.json());
            if (context.uiDirectoryExists) {
                const entry = await import('/@element-ui/index.js');
                if (typeof entry.mount === 'function') {
                    status.remove();
                    entry.mount(document.getElementById('root'), env);
                } else {
                    status.textContent = 'UI entry loaded from ' + context.uiDirectory;
                }
            } else {
                status.textContent = 'No custom UI at ' + context.uiDirectory;
            }
        } catch (e) {
            status.classList.add('error');
            status.textContent = 'Error: ' + e.message;
            console.error('[element-dev]', e);
        }

        const socket = new WebSocket(`ws://${location.host}/__element/ws`);
        socket.addEventListener('message', (event) => {
            const message = JSON.parse(event.data);
            if (message.type === 'update') {
                console.log('[element-dev] changed:', message.path);
                location.reload();
            }
        });
    </script>
</body>
</html>"#;
