//! Static input form.

use axum::response::Html;

/// `GET /`: HTML form that posts to `/predict`.
pub async fn page() -> Html<&'static str> {
    Html(FORM_PAGE_HTML)
}

const FORM_PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Predicción de estado de cita</title>
  <style>
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', system-ui, sans-serif;
      background: #fafaf9; color: #1c1917;
      min-height: 100vh; display: flex; flex-direction: column;
      align-items: center; justify-content: center; padding: 24px;
    }
    h1 { font-size: 24px; margin-bottom: 24px; }
    form { display: flex; flex-direction: column; gap: 12px; width: 100%; max-width: 360px; }
    label { font-size: 14px; color: #44403c; display: flex; flex-direction: column; gap: 4px; }
    input {
      padding: 10px 12px; font-size: 16px;
      border: 2px solid #d6d3d1; border-radius: 10px; outline: none;
    }
    input:focus { border-color: #4a7c59; }
    button {
      margin-top: 8px; padding: 14px; border-radius: 12px; font-size: 16px;
      font-weight: 500; cursor: pointer; border: none;
      background: #4a7c59; color: white;
    }
    .result { margin-top: 24px; min-height: 24px; text-align: center; font-weight: 600; }
    .result.error { color: #dc2626; }
  </style>
</head>
<body>
  <h1>Predicción de estado de cita</h1>

  <form id="form" method="post" action="/predict">
    <label>Edad <input name="edad" type="number" step="any" required></label>
    <label>Citas totales <input name="citas_totales" type="number" step="any" required></label>
    <label>Citas asistidas <input name="citas_asistidas" type="number" step="any" required></label>
    <label>Estado del tratamiento <input name="estado_tratamiento" type="text" required></label>
    <label>Monto del último pago <input name="monto_ultimo_pago" type="number" step="any" required></label>
    <label>Días entre citas <input name="dias_entre_citas" type="number" step="any" required></label>
    <button type="submit">Predecir</button>
  </form>

  <div class="result" id="result"></div>

  <script>
    var form = document.getElementById('form');
    var resultEl = document.getElementById('result');

    form.addEventListener('submit', function(e) {
      e.preventDefault();
      var body = new URLSearchParams(new FormData(form));
      fetch('/predict', { method: 'POST', body: body })
        .then(function(resp) { return resp.json(); })
        .then(function(data) {
          if (data.error) {
            resultEl.className = 'result error';
            resultEl.textContent = data.error;
          } else {
            resultEl.className = 'result';
            resultEl.textContent = 'Estado de la cita: ' + data.estado_cita;
          }
        })
        .catch(function(err) {
          resultEl.className = 'result error';
          resultEl.textContent = String(err);
        });
    });
  </script>
</body>
</html>
"#;
